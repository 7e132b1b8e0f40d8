//! Flag sets returned by `GET /v1/feature-flags`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Flags for one scope, keyed by flag name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagSet {
    flags: Map<String, Value>,
}

impl FlagSet {
    /// Create a flag set from raw values.
    pub fn new(flags: Map<String, Value>) -> Self {
        Self { flags }
    }

    /// Read the `flags` object of a response body.
    ///
    /// A missing or non-object `flags` field yields an empty set.
    pub fn from_response(body: &Value) -> Self {
        match body.get("flags") {
            Some(Value::Object(flags)) => Self::new(flags.clone()),
            _ => Self::default(),
        }
    }

    /// Whether a flag is on.
    ///
    /// Missing and `null` flags are off, booleans are themselves, and any
    /// other value (a variant string, a number, a config object) counts as on.
    pub fn is_active(&self, name: &str) -> bool {
        match self.flags.get(name) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(enabled)) => *enabled,
            Some(_) => true,
        }
    }

    /// Raw value of a flag.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.flags.get(name)
    }

    /// Flag names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.flags.keys().map(String::as_str)
    }

    /// Number of flags.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}
