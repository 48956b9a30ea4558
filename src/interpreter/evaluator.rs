/// The evaluator core: context, scope stack and statement execution.
///
/// Declares the `Context` struct holding the scope chain, the open-file
/// table and the output sink, plus statement evaluation and the control-flow
/// `Signal` type that carries `break`, `continue` and `return` up the walk.
pub mod core;
/// Expression evaluation.
///
/// Literals, identifier resolution (including dotted struct field chains),
/// operators with short-circuit logic, arrays, maps, struct literals,
/// indexing and slicing.
pub mod expr;
/// Function call machinery.
///
/// Resolves calls against the builtin registry, struct method declarations,
/// the inline `len`/`input` builtins and user functions; builds call frames
/// enclosed over the outermost scope.
pub mod function;
/// String interpolation.
///
/// Rescans string literals for `<% name %>` fragments at every evaluation
/// and splices in the current values.
pub mod interpolate;
