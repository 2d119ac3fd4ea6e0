//! Shared JSON document handle with pointer-addressed reads and
//! get-or-create writes.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde_json::{Map, Value};

use crate::pointer::parse_pointer;

/// A cheaply clonable, single-threaded handle over one JSON document tree.
///
/// All clones share the same root value. Reads return snapshots; writes
/// create missing intermediate path segments on the way down. Sharing a
/// document across threads is not supported.
#[derive(Debug, Clone)]
pub struct Document {
    root: Rc<RefCell<Value>>,
}

/// Non-owning reference to a [`Document`], as held by registration
/// callbacks. Upgrading fails once the last owning handle is dropped.
#[derive(Debug, Clone)]
pub struct WeakDocument {
    root: Weak<RefCell<Value>>,
}

impl Document {
    /// An empty object root.
    pub fn new() -> Self {
        Self::from_value(Value::Object(Map::new()))
    }

    pub fn from_value(root: Value) -> Self {
        Document {
            root: Rc::new(RefCell::new(root)),
        }
    }

    /// Snapshot clone of the whole tree.
    pub fn root(&self) -> Value {
        self.root.borrow().clone()
    }

    /// Resolves `pointer` and returns a snapshot of the value there, or
    /// `None` when any segment is absent. An explicit JSON null at the
    /// pointer counts as present.
    pub fn get(&self, pointer: &str) -> Option<Value> {
        let path = parse_pointer(pointer);
        let root = self.root.borrow();
        let mut current: &Value = &root;
        for token in &path {
            current = match current {
                Value::Object(map) => map.get(token)?,
                Value::Array(arr) => {
                    if token == "-" {
                        return None;
                    }
                    arr.get(token.parse::<usize>().ok()?)?
                }
                _ => return None,
            };
        }
        Some(current.clone())
    }

    /// Writes `value` at `pointer`, creating intermediate segments as
    /// needed: key tokens create objects, numeric tokens index arrays
    /// (null-padding growth), `-` appends. An intermediate of the wrong
    /// shape is replaced rather than treated as an error.
    pub fn set(&self, pointer: &str, value: Value) {
        let path = parse_pointer(pointer);
        let mut root = self.root.borrow_mut();
        set_at(&mut root, &path, value);
    }

    pub fn downgrade(&self) -> WeakDocument {
        WeakDocument {
            root: Rc::downgrade(&self.root),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl WeakDocument {
    pub fn upgrade(&self) -> Option<Document> {
        self.root.upgrade().map(|root| Document { root })
    }
}

fn set_at(target: &mut Value, path: &[String], value: Value) {
    let Some((token, rest)) = path.split_first() else {
        *target = value;
        return;
    };

    if token == "-" {
        if !matches!(target, Value::Array(_)) {
            *target = Value::Array(Vec::new());
        }
        if let Value::Array(arr) = target {
            arr.push(Value::Null);
            let slot = arr.len() - 1;
            set_at(&mut arr[slot], rest, value);
        }
        return;
    }

    if let Value::Array(arr) = target {
        if let Ok(index) = token.parse::<usize>() {
            if index >= arr.len() {
                arr.resize(index + 1, Value::Null);
            }
            set_at(&mut arr[index], rest, value);
            return;
        }
    }

    if !matches!(target, Value::Object(_)) {
        *target = Value::Object(Map::new());
    }
    if let Value::Object(map) = target {
        let slot = map.entry(token.clone()).or_insert(Value::Null);
        set_at(slot, rest, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_creates_object_intermediates() {
        let document = Document::new();
        document.set("/a/b/c", json!(5));
        assert_eq!(document.root(), json!({"a": {"b": {"c": 5}}}));
    }

    #[test]
    fn set_indexes_and_pads_existing_arrays() {
        let document = Document::from_value(json!({"list": [1, 2]}));
        document.set("/list/4", json!("x"));
        assert_eq!(
            document.root(),
            json!({"list": [1, 2, null, null, "x"]})
        );
    }

    #[test]
    fn set_appends_with_dash_token() {
        let document = Document::from_value(json!({"list": [1]}));
        document.set("/list/-", json!(2));
        assert_eq!(document.root(), json!({"list": [1, 2]}));
    }

    #[test]
    fn set_replaces_wrong_shaped_intermediates() {
        let document = Document::from_value(json!({"a": 3}));
        document.set("/a/b", json!(true));
        assert_eq!(document.root(), json!({"a": {"b": true}}));
    }

    #[test]
    fn set_at_root_replaces_the_tree() {
        let document = Document::from_value(json!({"old": 1}));
        document.set("", json!([1, 2]));
        assert_eq!(document.root(), json!([1, 2]));
    }

    #[test]
    fn get_resolves_nested_paths() {
        let document = Document::from_value(json!({"a": {"b": [10, 20]}}));
        assert_eq!(document.get("/a/b/1"), Some(json!(20)));
        assert_eq!(document.get("/a/missing"), None);
        assert_eq!(document.get("/a/b/5"), None);
        assert_eq!(document.get(""), Some(document.root()));
    }

    #[test]
    fn get_treats_explicit_null_as_present() {
        let document = Document::from_value(json!({"a": null}));
        assert_eq!(document.get("/a"), Some(Value::Null));
    }

    #[test]
    fn get_honors_escaped_tokens() {
        let document = Document::from_value(json!({"a/b": {"c~d": 1}}));
        assert_eq!(document.get("/a~1b/c~0d"), Some(json!(1)));
    }

    #[test]
    fn clones_share_the_same_root() {
        let document = Document::new();
        let alias = document.clone();
        alias.set("/k", json!(1));
        assert_eq!(document.get("/k"), Some(json!(1)));
    }

    #[test]
    fn weak_handle_dies_with_last_owner() {
        let document = Document::new();
        let weak = document.downgrade();
        assert!(weak.upgrade().is_some());
        drop(document);
        assert!(weak.upgrade().is_none());
    }
}
