/// Loader errors.
///
/// Defines all error types that can occur while composing a program from
/// multiple source files: unreadable files, package declaration mismatches,
/// and imports whose head file cannot be found in any source directory.
pub mod load_error;
/// Parsing errors.
///
/// Defines all error types that can occur during lexing and parsing of source
/// code. Parse errors include syntax mistakes, unexpected tokens, invalid
/// literals, and any other issues detected before type checking. Every parse
/// error carries the `line:col` position of the offending token.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation. For a
/// program that passed the type checker these are unreachable; they surface
/// only when evaluating an unchecked statement list.
pub mod runtime_error;
/// Type errors.
///
/// Contains the semantic diagnostics produced by the static type checker:
/// mismatched types, unknown functions and structs, bad struct literals,
/// `break` outside a loop, and so on. Type errors are collected across the
/// whole program and reported as a batch.
pub mod type_error;

pub use load_error::LoadError;
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
pub use type_error::TypeError;
