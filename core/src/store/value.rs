//! Tagged Value Tree
//!
//! A small dynamic value tree with dot-path addressing. The store keeps the
//! application state as a `Value::Map` so that generic tooling (observers,
//! the dev overlay, config merging) can address nested fields by path while
//! the typed [`AppState`](super::AppState) struct remains the source of the
//! defaults.
//!
//! "Not found" is expressed as `None`, never as a panic: looking up an
//! absent path is a normal outcome for callers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A dynamically typed state value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent / unset.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Integer (indices, counters).
    Int(i64),
    /// String (enumerations are stored by name).
    Str(String),
    /// Nested map of named values.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Create an empty map value.
    #[must_use]
    pub fn map() -> Self {
        Self::Map(BTreeMap::new())
    }

    /// Read the value at a dot-separated path.
    ///
    /// Returns `None` if any segment is absent or traverses a non-map.
    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut current = self;
        for segment in path.split('.') {
            match current {
                Self::Map(map) => current = map.get(segment)?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Write `value` at a dot-separated path, creating intermediate maps.
    ///
    /// An intermediate segment holding a leaf is replaced by a map; writes
    /// never fail.
    pub fn set_path(&mut self, path: &str, value: Value) {
        let mut current = self;
        let mut segments = path.split('.').peekable();

        while let Some(segment) = segments.next() {
            if !matches!(current, Self::Map(_)) {
                *current = Self::map();
            }
            let Self::Map(map) = current else {
                unreachable!("just coerced to a map");
            };

            if segments.peek().is_none() {
                map.insert(segment.to_string(), value);
                return;
            }
            current = map
                .entry(segment.to_string())
                .or_insert_with(Self::map);
        }
    }

    /// Interpret as a boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Interpret as an integer.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Interpret as a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Self::Int(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}
