use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Per-setting behavior flags, combined by bitwise OR.
///
/// The default is no flags set. The node itself only interprets
/// [`DO_NOT_AUTO_WRITE`], [`SAVE_INITIAL_VALUE`], and [`REMOTE`] (all inside
/// [`register_document`]); [`FORCE_SET`] is carried for the benefit of an
/// owning manager's merge policy.
///
/// [`DO_NOT_AUTO_WRITE`]: SettingOptions::DO_NOT_AUTO_WRITE
/// [`SAVE_INITIAL_VALUE`]: SettingOptions::SAVE_INITIAL_VALUE
/// [`REMOTE`]: SettingOptions::REMOTE
/// [`FORCE_SET`]: SettingOptions::FORCE_SET
/// [`register_document`]: crate::SettingNode::register_document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SettingOptions(u64);

impl SettingOptions {
    pub const NONE: SettingOptions = SettingOptions(0);

    /// Accepted value changes are not auto-persisted to a registered
    /// document.
    pub const DO_NOT_AUTO_WRITE: SettingOptions = SettingOptions(1 << 1);

    /// Caller-side override of merge behavior; not interpreted by the node.
    pub const FORCE_SET: SettingOptions = SettingOptions(1 << 2);

    /// Write the value into the document at registration time, even if it
    /// was never explicitly set.
    pub const SAVE_INITIAL_VALUE: SettingOptions = SettingOptions(1 << 3);

    /// Purely in-memory: never persisted, registration is a no-op.
    pub const REMOTE: SettingOptions = SettingOptions(1 << 4);

    /// True iff **every** bit of `flags` is present in `self`.
    ///
    /// Querying with a combination of flags therefore returns true only when
    /// all of them are set simultaneously; `enabled(NONE)` is always true.
    pub fn enabled(self, flags: SettingOptions) -> bool {
        (self.0 & flags.0) == flags.0
    }

    pub fn bits(self) -> u64 {
        self.0
    }
}

impl BitOr for SettingOptions {
    type Output = SettingOptions;

    fn bitor(self, rhs: SettingOptions) -> SettingOptions {
        SettingOptions(self.0 | rhs.0)
    }
}

impl BitOrAssign for SettingOptions {
    fn bitor_assign(&mut self, rhs: SettingOptions) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for SettingOptions {
    type Output = SettingOptions;

    fn bitand(self, rhs: SettingOptions) -> SettingOptions {
        SettingOptions(self.0 & rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabled_requires_every_queried_bit() {
        let options = SettingOptions::DO_NOT_AUTO_WRITE | SettingOptions::SAVE_INITIAL_VALUE;

        assert!(options.enabled(SettingOptions::DO_NOT_AUTO_WRITE));
        assert!(options.enabled(SettingOptions::SAVE_INITIAL_VALUE));
        assert!(options.enabled(
            SettingOptions::DO_NOT_AUTO_WRITE | SettingOptions::SAVE_INITIAL_VALUE
        ));
        assert!(!options.enabled(SettingOptions::REMOTE));
        assert!(!options.enabled(SettingOptions::DO_NOT_AUTO_WRITE | SettingOptions::REMOTE));
    }

    #[test]
    fn enabled_none_is_always_true() {
        assert!(SettingOptions::NONE.enabled(SettingOptions::NONE));
        assert!(SettingOptions::REMOTE.enabled(SettingOptions::NONE));
    }

    #[test]
    fn default_has_no_flags_set() {
        let options = SettingOptions::default();
        assert_eq!(options, SettingOptions::NONE);
        assert!(!options.enabled(SettingOptions::FORCE_SET));
    }

    #[test]
    fn or_assign_accumulates() {
        let mut options = SettingOptions::NONE;
        options |= SettingOptions::REMOTE;
        options |= SettingOptions::FORCE_SET;
        assert!(options.enabled(SettingOptions::REMOTE | SettingOptions::FORCE_SET));
        assert_eq!(
            (options & SettingOptions::REMOTE).bits(),
            SettingOptions::REMOTE.bits()
        );
    }
}
