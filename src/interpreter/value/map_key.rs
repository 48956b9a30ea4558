use crate::interpreter::value::core::Value;

/// A map key.
///
/// Only the hashable primitive values can key a map; composite values and
/// `nil` are rejected at the conversion boundary, and the type checker
/// restricts declared key types to the same subset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MapKey {
    /// An integer key.
    Int(i64),
    /// A string key.
    Str(String),
    /// A boolean key.
    Bool(bool),
}

impl MapKey {
    /// Converts a runtime value into a map key, if its type permits.
    ///
    /// # Returns
    /// - `Some(MapKey)` for `int`, `string` and `bool` values.
    /// - `None` for every other value.
    ///
    /// # Example
    /// ```
    /// use tox::interpreter::value::{core::Value, map_key::MapKey};
    ///
    /// assert_eq!(MapKey::from_value(&Value::Int(3)), Some(MapKey::Int(3)));
    /// assert_eq!(MapKey::from_value(&Value::Nil), None);
    /// ```
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(n) => Some(Self::Int(*n)),
            Value::Str(s) => Some(Self::Str(s.clone())),
            Value::Bool(b) => Some(Self::Bool(*b)),
            _ => None,
        }
    }
}

impl std::fmt::Display for MapKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}
