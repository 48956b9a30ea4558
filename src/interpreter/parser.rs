/// Entry points and error recovery for parsing.
///
/// Drives statement parsing across a whole token stream, accumulating errors
/// and resynchronizing at statement boundaries instead of aborting on the
/// first failure.
pub mod core;
/// Expression parsing.
///
/// Implements the precedence ladder (unary, logical, comparison, additive,
/// multiplicative, primary) and the postfix chains for calls, indexing,
/// slicing, dotted names and struct literals.
pub mod expression;
/// Statement parsing.
///
/// One parse function per statement form: `let` (including the map form),
/// `fnc` (including methods), `struct`, control flow, assignments, `log`,
/// `package` and `import`.
pub mod statement;
/// Shared token-stream helpers used by the statement and expression parsers.
pub mod utils;
