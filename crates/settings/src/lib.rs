//! Typed, path-addressable settings nodes over a shared JSON document.
//!
//! Each [`SettingData<T>`] holds a default and a current value of type `T`,
//! lives at a JSON-Pointer-style path inside a shared [`Document`], detects
//! redundant writes through the per-type [`SettingValue`] trait, and
//! notifies subscribers synchronously on every accepted change — first the
//! typed signal, then the type-erased one.
//!
//! The whole crate is single-threaded and cooperative: no locking, no
//! queues, signal delivery inline within the mutating call.
//!
//! # Example
//!
//! ```
//! use json_settings::{Document, SettingData, SettingNode, SignalArgs};
//!
//! let document = Document::new();
//! let volume = SettingData::at("/audio/volume", 50i64);
//! volume.register_document(&document);
//!
//! volume.set_value(75, SignalArgs::default());
//! assert_eq!(document.get("/audio/volume"), Some(serde_json::json!(75)));
//! assert!(volume.has_been_set());
//!
//! // Writing the same value again is suppressed: no signal, no write.
//! volume.set_value(75, SignalArgs::default());
//! ```

pub mod args;
pub mod document;
pub mod node;
pub mod options;
pub mod pointer;
pub mod setting;
pub mod value;

pub use args::{SignalArgs, Source};
pub use document::{Document, WeakDocument};
pub use node::SettingNode;
pub use options::SettingOptions;
pub use setting::{ChangeEvent, SettingData};
pub use value::{SettingValue, ValueError};

pub use json_settings_signals::{Signal, SubscriptionId};
