//! Types are plain strings with a fixed grammar: the primitives `int`,
//! `string`, `bool`, `void` and `any`; array types `T[]`; map types
//! `map[K]V`; and registered struct names. This module owns the string-level
//! operations on that grammar.

/// The primitive type names.
pub const PRIMITIVES: &[&str] = &["int", "string", "bool", "void", "any"];

/// The types allowed as map keys (the hashable subset).
pub const MAP_KEY_TYPES: &[&str] = &["int", "string", "bool"];

/// Returns `true` for a primitive type name.
#[must_use]
pub fn is_primitive(ty: &str) -> bool {
    PRIMITIVES.contains(&ty)
}

/// Returns `true` for an array type (`T[]`).
#[must_use]
pub fn is_array(ty: &str) -> bool {
    ty.ends_with("[]")
}

/// Strips the `[]` suffix off an array type.
///
/// # Example
/// ```
/// use tox::interpreter::typechecker::types::elem_type;
///
/// assert_eq!(elem_type("int[]"), Some("int"));
/// assert_eq!(elem_type("int"), None);
/// ```
#[must_use]
pub fn elem_type(ty: &str) -> Option<&str> {
    ty.strip_suffix("[]")
}

/// Returns `true` for a map type (`map[K]V`).
#[must_use]
pub fn is_map(ty: &str) -> bool {
    ty.starts_with("map[")
}

/// Splits a map type into its key and value types.
///
/// # Example
/// ```
/// use tox::interpreter::typechecker::types::map_types;
///
/// assert_eq!(map_types("map[string]int"), Some(("string", "int")));
/// assert_eq!(map_types("map[string]int[]"), Some(("string", "int[]")));
/// assert_eq!(map_types("int[]"), None);
/// ```
#[must_use]
pub fn map_types(ty: &str) -> Option<(&str, &str)> {
    let rest = ty.strip_prefix("map[")?;
    let close = rest.find(']')?;
    Some((&rest[..close], &rest[close + 1..]))
}

/// Returns `true` when the type string can only denote a struct: not a
/// primitive, not an array, not a map.
#[must_use]
pub fn is_struct_name(ty: &str) -> bool {
    !is_primitive(ty) && !is_array(ty) && !is_map(ty) && ty != "nil"
}

/// Tests whether a value of type `actual` may be bound where `declared` is
/// required.
///
/// Beyond exact equality: `any` accepts every non-array, non-void value;
/// `any[]` accepts every array; an empty array literal (inferred `any[]`)
/// fits every array type; and `nil` fits struct- and map-typed slots.
///
/// # Example
/// ```
/// use tox::interpreter::typechecker::types::assignable;
///
/// assert!(assignable("int", "int"));
/// assert!(assignable("any", "string"));
/// assert!(!assignable("any", "int[]"));
/// assert!(assignable("any[]", "int[]"));
/// assert!(assignable("int[]", "any[]"));
/// assert!(assignable("User", "nil"));
/// assert!(!assignable("int", "string"));
/// ```
#[must_use]
pub fn assignable(declared: &str, actual: &str) -> bool {
    if declared == actual {
        return true;
    }
    if declared == "any" {
        return !is_array(actual) && actual != "void";
    }
    if declared == "any[]" {
        return is_array(actual);
    }
    if is_array(declared) && actual == "any[]" {
        return true;
    }
    if actual == "nil" {
        return is_map(declared) || is_struct_name(declared);
    }
    false
}

/// Validates a declared type against the grammar and the registered struct
/// names.
///
/// `void` is only valid where the caller says so (function returns).
#[must_use]
pub fn valid_type<S>(ty: &str, is_registered_struct: &S) -> bool
    where S: Fn(&str) -> bool
{
    if ty == "void" {
        return false;
    }
    if is_primitive(ty) {
        return true;
    }
    // Map types are tested before arrays so that `map[string]int[]` reads
    // as a map of int arrays, matching how the map-let form builds it.
    if let Some((key, value)) = map_types(ty) {
        return MAP_KEY_TYPES.contains(&key) && valid_type(value, is_registered_struct);
    }
    if let Some(elem) = elem_type(ty) {
        return valid_type(elem, is_registered_struct);
    }
    is_registered_struct(ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_array_and_map_types_parse() {
        assert_eq!(elem_type("int[][]"), Some("int[]"));
        assert_eq!(map_types("map[int]map[string]int"), Some(("int", "map[string]int")));
    }

    #[test]
    fn validity_needs_registered_structs() {
        let structs = |name: &str| name == "User";
        assert!(valid_type("User", &structs));
        assert!(valid_type("User[]", &structs));
        assert!(valid_type("map[string]User", &structs));
        assert!(!valid_type("Ghost", &structs));
        assert!(!valid_type("map[User]int", &structs));
        assert!(!valid_type("void", &structs));
    }

    #[test]
    fn nil_is_not_assignable_to_primitives() {
        assert!(!assignable("int", "nil"));
        assert!(assignable("map[string]int", "nil"));
    }
}
