use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{ast::FunctionDecl, interpreter::value::map_key::MapKey};

/// The reserved struct slot holding the instance's type name.
///
/// Method dispatch reads this slot to find `Type.method` declarations.
pub const STRUCT_TYPE_SLOT: &str = "_struct";

/// Represents a runtime value in the interpreter.
///
/// This enum models all the possible types that can appear in expressions,
/// assignments, function returns and conditions. Arrays, maps and struct
/// instances are shared by reference: cloning a `Value` clones the handle,
/// not the container.
#[derive(Debug, Clone)]
pub enum Value {
    /// A 64-bit signed integer.
    Int(i64),
    /// A string.
    Str(String),
    /// A boolean value (`true` or `false`).
    Bool(bool),
    /// An array of values, mutable in place through any alias.
    Array(Rc<RefCell<Vec<Value>>>),
    /// A map from primitive keys to values, mutable in place.
    Map(Rc<RefCell<HashMap<MapKey, Value>>>),
    /// A struct instance: field values plus the reserved
    /// [`STRUCT_TYPE_SLOT`] entry naming the struct type.
    Struct(Rc<RefCell<HashMap<String, Value>>>),
    /// A function value capturing its declaration.
    Function(Rc<FunctionDecl>),
    /// An open file handle minted by the builtin registry.
    File(i64),
    /// The `nil` value.
    Nil,
}

impl Value {
    /// Builds an array value from elements.
    #[must_use]
    pub fn array(elements: Vec<Self>) -> Self {
        Self::Array(Rc::new(RefCell::new(elements)))
    }

    /// Builds a map value from key/value pairs.
    #[must_use]
    pub fn map(pairs: HashMap<MapKey, Self>) -> Self {
        Self::Map(Rc::new(RefCell::new(pairs)))
    }

    /// Builds a struct instance of the named type from its fields.
    ///
    /// The reserved type slot is filled in here.
    #[must_use]
    pub fn struct_instance(type_name: &str, mut fields: HashMap<String, Self>) -> Self {
        fields.insert(STRUCT_TYPE_SLOT.to_string(), Self::Str(type_name.to_string()));
        Self::Struct(Rc::new(RefCell::new(fields)))
    }

    /// Reads the type name out of a struct instance.
    ///
    /// Returns `None` for non-struct values or instances whose type slot was
    /// clobbered.
    #[must_use]
    pub fn struct_type(&self) -> Option<String> {
        match self {
            Self::Struct(fields) => match fields.borrow().get(STRUCT_TYPE_SLOT) {
                Some(Self::Str(name)) => Some(name.clone()),
                _ => None,
            },
            _ => None,
        }
    }

    /// Tests the value for truthiness.
    ///
    /// `bool` counts as itself, a nonzero `int` is true, a nonempty `string`
    /// is true, `nil` is false, and every other value is true.
    ///
    /// # Example
    /// ```
    /// use tox::interpreter::value::core::Value;
    ///
    /// assert!(Value::Int(3).is_truthy());
    /// assert!(!Value::Int(0).is_truthy());
    /// assert!(!Value::Str(String::new()).is_truthy());
    /// assert!(!Value::Nil.is_truthy());
    /// assert!(Value::array(vec![]).is_truthy());
    /// ```
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Str(s) => !s.is_empty(),
            Self::Nil => false,
            _ => true,
        }
    }

    /// Returns `true` if the value is [`Nil`](Self::Nil).
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }
}

/// Equality follows the language's `==` operator: primitives compare by
/// value, composite values compare by identity (two aliases of one container
/// are equal, two equal-looking containers are not), and mismatched types
/// are never equal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => Rc::ptr_eq(a, b),
            (Self::Map(a), Self::Map(b)) => Rc::ptr_eq(a, b),
            (Self::Struct(a), Self::Struct(b)) => Rc::ptr_eq(a, b),
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::File(a), Self::File(b)) => a == b,
            (Self::Nil, Self::Nil) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Array(elements) => {
                write!(f, "[")?;
                for (index, value) in elements.borrow().iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            },
            Self::Map(pairs) => {
                // Sorted so that printing a map is deterministic.
                let pairs = pairs.borrow();
                let mut entries: Vec<(String, String)> =
                    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
                entries.sort();
                write!(f, "{{")?;
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            },
            Self::Struct(fields) => {
                let fields = fields.borrow();
                let name = match fields.get(STRUCT_TYPE_SLOT) {
                    Some(Self::Str(name)) => name.clone(),
                    _ => String::new(),
                };
                let mut names: Vec<&String> =
                    fields.keys().filter(|k| k.as_str() != STRUCT_TYPE_SLOT).collect();
                names.sort();
                write!(f, "{name}{{")?;
                for (index, field) in names.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{field}: {}", fields[*field])?;
                }
                write!(f, "}}")
            },
            Self::Function(decl) => write!(f, "fnc {}", decl.name),
            Self::File(handle) => write!(f, "file({handle})"),
            Self::Nil => write!(f, "nil"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_compare_equal_copies_do_not() {
        let xs = Value::array(vec![Value::Int(1)]);
        let ys = xs.clone();
        let zs = Value::array(vec![Value::Int(1)]);

        assert_eq!(xs, ys);
        assert_ne!(xs, zs);
    }

    #[test]
    fn heterogeneous_comparison_is_false() {
        assert_ne!(Value::Int(1), Value::Str("1".to_string()));
        assert_ne!(Value::Bool(true), Value::Int(1));
    }

    #[test]
    fn struct_instances_carry_their_type() {
        let user = Value::struct_instance("User", HashMap::new());
        assert_eq!(user.struct_type(), Some("User".to_string()));
        assert_eq!(Value::Int(1).struct_type(), None);
    }

    #[test]
    fn arrays_display_like_source_literals() {
        let xs = Value::array(vec![Value::Int(1), Value::Str("two".to_string()), Value::Nil]);
        assert_eq!(xs.to_string(), "[1, two, nil]");
    }
}
