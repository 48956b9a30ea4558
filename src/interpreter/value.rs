/// The value module defines the runtime data types for evaluation.
///
/// This module declares all the value types used during interpretation:
/// integers, strings, booleans, arrays, maps, struct instances, function
/// values, file handles and `nil`. Arrays, maps and structs are
/// reference-semantic: bindings share the underlying container and mutations
/// through any alias are visible through every other alias.
///
/// # Responsibilities
/// - Defines the `Value` enum and all supported value variants.
/// - Implements display formatting, truthiness and equality semantics.
/// - Provides the hashable key subset used by map values.
pub mod core;
/// Map keys.
///
/// Maps can only be keyed by the hashable value subset (`int`, `string`,
/// `bool`); this module defines that key type and its conversions.
pub mod map_key;
