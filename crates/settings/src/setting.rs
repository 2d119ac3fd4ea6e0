use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::Value;
use tracing::debug;

use json_settings_signals::{Signal, SubscriptionId};

use crate::args::{SignalArgs, Source};
use crate::document::Document;
use crate::node::SettingNode;
use crate::options::SettingOptions;
use crate::value::{SettingValue, ValueError};

/// Payload delivered to typed change observers.
#[derive(Debug, Clone)]
pub struct ChangeEvent<T> {
    /// The accepted value, equal to what [`SettingData::value`] returns
    /// during delivery.
    pub value: T,
    /// Metadata with the node's canonical path and the change source.
    pub args: SignalArgs,
}

/// One typed, path-addressable setting: a default value, a current value,
/// and synchronous change signals.
///
/// Created only through the factory functions, which return `Rc<Self>`;
/// the struct has no public constructor, so every instance starts with
/// `value == default` unless a distinct current value was supplied.
///
/// Getters return clones; no aliasing into the stored values is exposed.
pub struct SettingData<T: SettingValue> {
    path: RefCell<String>,
    options: Cell<SettingOptions>,
    value_has_been_set: Cell<bool>,
    default_value: RefCell<T>,
    value: RefCell<T>,
    value_changed: Signal<ChangeEvent<T>>,
    simple_value_changed: Signal<SignalArgs>,
}

impl<T: SettingValue> SettingData<T> {
    fn build(path: String, default_value: T, current_value: Option<T>) -> Rc<Self> {
        let value = current_value.unwrap_or_else(|| default_value.clone());
        Rc::new(SettingData {
            path: RefCell::new(path),
            options: Cell::new(SettingOptions::NONE),
            value_has_been_set: Cell::new(false),
            default_value: RefCell::new(default_value),
            value: RefCell::new(value),
            value_changed: Signal::new(),
            simple_value_changed: Signal::new(),
        })
    }

    /// A node with no path yet; the current value starts at the default.
    pub fn new(default_value: T) -> Rc<Self> {
        Self::build(String::new(), default_value, None)
    }

    /// A node whose current value is distinct from its default. The node
    /// still reports [`has_been_set`] false until a mutation is accepted.
    ///
    /// [`has_been_set`]: SettingNode::has_been_set
    pub fn with_value(default_value: T, current_value: T) -> Rc<Self> {
        Self::build(String::new(), default_value, Some(current_value))
    }

    /// A node addressed at `path`, starting at its default.
    pub fn at(path: impl Into<String>, default_value: T) -> Rc<Self> {
        Self::build(path.into(), default_value, None)
    }

    pub fn value(&self) -> T {
        self.value.borrow().clone()
    }

    pub fn default_value(&self) -> T {
        self.default_value.borrow().clone()
    }

    /// Replaces the default only; the current value is untouched and no
    /// signal fires.
    pub fn set_default_value(&self, new_default: T) {
        *self.default_value.borrow_mut() = new_default;
    }

    /// Applies `new_value` unless the value trait judges it equivalent to
    /// the current value.
    ///
    /// On an accepted change: `has_been_set` becomes true, the metadata's
    /// path is overwritten with the node's canonical path, an `Unset`
    /// source defaults to `Setter`, and the typed signal fires followed by
    /// the type-erased signal — synchronously, on the calling thread,
    /// within this call. On a suppressed change nothing happens at all.
    pub fn set_value(&self, new_value: T, args: SignalArgs) {
        self.update_value(new_value, args);
    }

    /// Like [`set_value`], but reports whether the change was accepted.
    ///
    /// [`set_value`]: SettingData::set_value
    pub fn update_value(&self, new_value: T, mut args: SignalArgs) -> bool {
        if self.value.borrow().eq_values(&new_value) {
            return false;
        }

        self.value_has_been_set.set(true);
        *self.value.borrow_mut() = new_value.clone();

        args.path = self.path();
        if args.source == Source::Unset {
            args.source = Source::Setter;
        }

        let event = ChangeEvent {
            value: new_value,
            args,
        };
        self.value_changed.invoke(&event);
        self.simple_value_changed.invoke(&event.args);
        true
    }

    /// `set_value(default, args)` with the pre-call `has_been_set` restored
    /// afterward: resetting to default is deliberately distinguishable from
    /// "never touched".
    pub fn reset_to_default(&self, args: SignalArgs) {
        let was_set = self.value_has_been_set.get();
        self.set_value(self.default_value(), args);
        self.value_has_been_set.set(was_set);
    }

    /// Connects a typed change observer.
    pub fn on_change<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&ChangeEvent<T>) + 'static,
    {
        self.value_changed.connect(observer)
    }

    /// The strongly-typed change signal.
    pub fn value_changed(&self) -> &Signal<ChangeEvent<T>> {
        &self.value_changed
    }
}

impl<T: SettingValue> SettingNode for SettingData<T> {
    fn path(&self) -> String {
        self.path.borrow().clone()
    }

    fn set_path(&self, path: &str) {
        *self.path.borrow_mut() = path.to_owned();
    }

    fn options(&self) -> SettingOptions {
        self.options.get()
    }

    fn set_options(&self, options: SettingOptions) {
        self.options.set(options);
    }

    fn has_been_set(&self) -> bool {
        self.value_has_been_set.get()
    }

    fn marshal_into(&self) -> Value {
        self.value.borrow().to_json()
    }

    fn unmarshal_from(&self, document: &Document) -> Result<bool, ValueError> {
        let Some(raw) = self.resolve(document) else {
            return Ok(false);
        };
        self.unmarshal_value(&raw)
    }

    fn unmarshal_value(&self, value: &Value) -> Result<bool, ValueError> {
        let new_value = T::from_json(value)?;
        let args = SignalArgs {
            path: self.path(),
            source: Source::Unmarshal,
        };
        self.set_value(new_value, args);
        Ok(true)
    }

    fn register_document(&self, document: &Document) {
        let path = self.path();
        let options = self.options.get();

        if options.enabled(SettingOptions::REMOTE) {
            debug!(path = %path, "remote setting, skipping document registration");
            return;
        }

        if !options.enabled(SettingOptions::DO_NOT_AUTO_WRITE) {
            // The observer reads the canonical path and the accepted value
            // from the event, so no node self-handle is captured and no Rc
            // cycle can form.
            let weak = document.downgrade();
            self.value_changed.connect(move |event: &ChangeEvent<T>| {
                if let Some(document) = weak.upgrade() {
                    document.set(&event.args.path, event.value.to_json());
                }
            });
        }

        if options.enabled(SettingOptions::SAVE_INITIAL_VALUE) {
            self.marshal(document);
        }

        debug!(path = %path, options = options.bits(), "registered document");
    }

    fn changed(&self) -> &Signal<SignalArgs> {
        &self.simple_value_changed
    }
}
