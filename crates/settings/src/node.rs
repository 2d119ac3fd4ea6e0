use serde_json::Value;
use tracing::trace;

use json_settings_signals::Signal;

use crate::args::SignalArgs;
use crate::document::Document;
use crate::options::SettingOptions;
use crate::value::ValueError;

/// Type-erased view of one setting node.
///
/// Implemented by [`SettingData<T>`](crate::SettingData) for every value
/// type; holders that do not know `T` use this trait to marshal, unmarshal,
/// and observe changes. Nodes live behind `Rc` handles; dropping the last
/// handle releases all signal subscriptions.
pub trait SettingNode {
    /// The node's canonical path inside a document, e.g. `/a/b/3/c`.
    fn path(&self) -> String;

    /// Replaces the path. No format validation is performed; a malformed
    /// path is the caller's responsibility.
    fn set_path(&self, path: &str);

    fn options(&self) -> SettingOptions;

    fn set_options(&self, options: SettingOptions);

    /// True iff an explicit mutation (direct set or successful unmarshal)
    /// has ever occurred. Unaffected by resetting to the default value.
    fn has_been_set(&self) -> bool;

    /// The JSON representation of the current value.
    fn marshal_into(&self) -> Value;

    /// Reads this node's value back from `document`.
    ///
    /// Returns `Ok(false)` with the value untouched when nothing exists at
    /// the node's path; deserialization failures propagate unchanged.
    fn unmarshal_from(&self, document: &Document) -> Result<bool, ValueError>;

    /// Like [`unmarshal_from`], but the JSON value has already been located
    /// by the caller, e.g. while iterating a container.
    ///
    /// [`unmarshal_from`]: SettingNode::unmarshal_from
    fn unmarshal_value(&self, value: &Value) -> Result<bool, ValueError>;

    /// Subscribes an internal observer so every future accepted value change
    /// re-marshals into `document`, subject to the node's options: `REMOTE`
    /// makes this a no-op, `DO_NOT_AUTO_WRITE` skips the observer, and
    /// `SAVE_INITIAL_VALUE` performs one immediate marshal regardless of
    /// [`has_been_set`].
    ///
    /// The subscription holds only a weak reference to the document: the
    /// caller keeps the document alive, and once it is gone the
    /// subscription is silently inert.
    ///
    /// [`has_been_set`]: SettingNode::has_been_set
    fn register_document(&self, document: &Document);

    /// The type-erased change signal, fired with the same metadata as the
    /// typed signal and after it.
    fn changed(&self) -> &Signal<SignalArgs>;

    /// True iff every bit of `flags` is present in the node's options.
    fn option_enabled(&self, flags: SettingOptions) -> bool {
        self.options().enabled(flags)
    }

    /// Writes the current value into `document` at this node's path,
    /// creating intermediate segments as needed.
    fn marshal(&self, document: &Document) {
        let path = self.path();
        trace!(path = %path, "marshal");
        document.set(&path, self.marshal_into());
    }

    /// Snapshot of the value at this node's path, `None` when absent.
    fn resolve(&self, document: &Document) -> Option<Value> {
        document.get(&self.path())
    }
}
