/// The builtin registry: host-provided callables with declared return types.
///
/// A single name-keyed table consulted by both the type checker (for
/// signatures) and the evaluator (for implementations). Covers console and
/// file I/O, directories, paths, strings, byte buffers and time.
pub mod builtins;
/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator traverses the AST, evaluates expressions and statements,
/// performs arithmetic and logical operations, manages the lexical scope
/// chain, dispatches calls and methods, and carries `break`/`continue`/
/// `return` as signals. It is the execution engine of the interpreter.
///
/// # Responsibilities
/// - Evaluates AST nodes, performing all supported operations.
/// - Handles variables, functions, structs, arrays, maps and control flow.
/// - Never aborts on runtime misuse; out-of-range and mistyped operations
///   yield `nil`.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text and produces a stream of tokens, each
/// carrying its `line:col` position. Keywords are case-insensitive, comments
/// and whitespace are skipped, and unrecognized characters surface as
/// `Illegal` tokens instead of failures.
///
/// # Responsibilities
/// - Converts the input character stream into positioned tokens.
/// - Handles numeric and string literals, identifiers and operators.
/// - Guarantees termination with a trailing `Eof` token.
pub mod lexer;
/// The loader composes one program out of many source files.
///
/// Starting from an entry file, the loader parses every source file of the
/// entry directory as one package, resolves `import` declarations to head
/// files under the configured source directories, enforces package naming,
/// and re-exports `pub` declarations of imported modules under
/// `module.name` aliases.
pub mod loader;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and
/// constructs an AST for statements and expressions. Errors are accumulated
/// with positions and parsing resynchronizes at statement boundaries.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes (expressions, statements).
/// - Validates grammar and syntax, reporting errors with location info.
/// - Recovers at statement boundaries instead of aborting.
pub mod parser;
/// The static type checker.
///
/// A two-pass checker: registration of functions, structs and globals, then
/// a scoped walk over every statement validating declarations, assignments,
/// control flow, calls and expressions. Diagnostics are collected across the
/// whole program and reported as a batch.
pub mod typechecker;
/// The value module defines the runtime data types for evaluation.
///
/// Declares the `Value` enum and the map key subset, with display
/// formatting, truthiness and the reference-semantic sharing contract for
/// arrays, maps and structs.
pub mod value;
