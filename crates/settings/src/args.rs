/// Where a value change originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Source {
    /// Not specified by the caller; defaulted to [`Setter`] at invocation
    /// time.
    ///
    /// [`Setter`]: Source::Setter
    #[default]
    Unset,
    /// A direct call to the typed setter.
    Setter,
    /// A value read back from a document.
    Unmarshal,
    /// A change initiated outside the node's own setter/unmarshal path,
    /// e.g. an owning manager merging remote state. Never assigned by the
    /// node itself.
    External,
}

/// Per-change metadata delivered with both the typed and the type-erased
/// change signals.
///
/// `path` is always overwritten with the node's canonical path before
/// delivery, regardless of what the caller supplied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignalArgs {
    pub path: String,
    pub source: Source,
}

impl SignalArgs {
    pub fn with_source(source: Source) -> Self {
        SignalArgs {
            path: String::new(),
            source,
        }
    }
}
