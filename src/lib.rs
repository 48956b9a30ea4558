//! # tox
//!
//! Tox is a small statically typed scripting language implemented as a
//! pipeline of stages: lexer, parser, multi-file package loader, static type
//! checker, and a tree-walking evaluator with lexical scoping, structs,
//! methods, first-class maps and arrays, and `break`/`continue` signals.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

use std::path::Path;

use crate::{
    error::{LoadError, ParseError, RuntimeError, TypeError},
    interpreter::{
        evaluator::core::Context,
        lexer,
        loader::{self, LoaderConfig},
        parser, typechecker,
        value::core::Value,
    },
};

/// Defines the structure of parsed code.
///
/// This module declares the `Statement` and `Expr` enums and related types
/// that represent the syntactic structure of source code as a tree. The AST
/// is built by the parser, combined across files by the loader, validated by
/// the type checker and traversed by the evaluator.
///
/// # Responsibilities
/// - Defines statement and expression types for all language constructs.
/// - Attaches source locations to AST nodes for error reporting.
/// - Shares function declarations with the runtime through `Rc`.
pub mod ast;
/// Provides unified error types for every pipeline stage.
///
/// This module defines all errors that can be raised during lexing, parsing,
/// loading, type checking or evaluation. It standardizes error reporting and
/// carries source positions for debugging and user feedback.
///
/// # Responsibilities
/// - Defines error enums for all failure modes, one file per stage.
/// - Attaches `line:col` positions and detailed messages.
/// - Integrates with the standard error traits.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, loading, type checking,
/// evaluation, value representations and the builtin registry to provide a
/// complete runtime for Tox programs.
///
/// # Responsibilities
/// - Coordinates all core components of the pipeline.
/// - Provides entry points for loading, checking and running programs.
/// - Manages the flow of data and errors between stages.
pub mod interpreter;
/// General utilities shared across stages.
///
/// # Responsibilities
/// - Index clamping and checked conversions between `i64` and `usize`.
pub mod util;

/// An error from any stage of the pipeline.
///
/// Parse and type errors arrive in batches: those stages collect every
/// diagnostic across the whole program before reporting.
#[derive(Debug)]
pub enum ToxError {
    /// The source failed to parse; all accumulated errors are carried.
    Parse(Vec<ParseError>),
    /// The loader failed to compose the program.
    Load(LoadError),
    /// The type checker rejected the program; all diagnostics are carried.
    Type(Vec<TypeError>),
    /// Evaluation failed (unreachable for type-checked programs).
    Runtime(RuntimeError),
}

impl std::fmt::Display for ToxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(errors) => {
                writeln!(f, "Parse errors:")?;
                for e in errors {
                    writeln!(f, "  - {e}")?;
                }
                Ok(())
            },
            Self::Load(e) => write!(f, "Import error: {e}"),
            Self::Type(errors) => {
                writeln!(f, "Type errors:")?;
                for e in errors {
                    writeln!(f, "  - {e}")?;
                }
                Ok(())
            },
            Self::Runtime(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ToxError {}

impl From<LoadError> for ToxError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

impl From<RuntimeError> for ToxError {
    fn from(e: RuntimeError) -> Self {
        Self::Runtime(e)
    }
}

/// Parses and type-checks a single source string into a statement list.
///
/// # Errors
/// Returns the accumulated parse errors or type diagnostics.
pub fn check_source(source: &str) -> Result<Vec<ast::Statement>, ToxError> {
    let (statements, errors) = parser::core::parse_program(&lexer::lex(source));
    if !errors.is_empty() {
        return Err(ToxError::Parse(errors));
    }
    let diagnostics = typechecker::core::check(&statements);
    if !diagnostics.is_empty() {
        return Err(ToxError::Type(diagnostics));
    }
    Ok(statements)
}

/// Runs a single-file program.
///
/// The pipeline is lex, parse, type-check, evaluate the top level, then
/// invoke `main` if one was declared.
///
/// # Errors
/// Returns an error for the first stage that fails; later stages do not run.
///
/// # Examples
/// ```
/// use tox::run_source;
///
/// let source = "fnc main () >> void { log(1 + 2 * 3) }";
/// assert!(run_source(source).is_ok());
///
/// // 'y' is undeclared, so the type checker rejects the program.
/// assert!(run_source("let x int >> y").is_err());
/// ```
pub fn run_source(source: &str) -> Result<(), ToxError> {
    let statements = check_source(source)?;
    let mut context = Context::new();
    run_statements(&statements, &mut context)
}

/// Runs a single-file program with its output captured.
///
/// # Errors
/// Same as [`run_source`].
///
/// # Examples
/// ```
/// use tox::run_source_captured;
///
/// let lines = run_source_captured("fnc main () >> void { log(\"hi\") }").unwrap();
/// assert_eq!(lines, vec!["hi".to_string()]);
/// ```
pub fn run_source_captured(source: &str) -> Result<Vec<String>, ToxError> {
    let statements = check_source(source)?;
    let mut context = Context::with_capture();
    run_statements(&statements, &mut context)?;
    Ok(context.captured_output().to_vec())
}

/// Runs a multi-file program from its entry file.
///
/// The loader composes the combined statement list across packages and
/// imports before checking and evaluation.
///
/// # Errors
/// Returns an error for the first stage that fails: unreadable sources,
/// parse errors, import failures, type errors, then runtime failures.
pub fn run_file(entry: &Path, config: &LoaderConfig) -> Result<(), ToxError> {
    let statements = load_and_check(entry, config)?;
    let mut context = Context::new();
    run_statements(&statements, &mut context)
}

/// Runs a multi-file program with its output captured.
///
/// # Errors
/// Same as [`run_file`].
pub fn run_file_captured(entry: &Path, config: &LoaderConfig) -> Result<Vec<String>, ToxError> {
    let statements = load_and_check(entry, config)?;
    let mut context = Context::with_capture();
    run_statements(&statements, &mut context)?;
    Ok(context.captured_output().to_vec())
}

/// Loads a multi-file program and type-checks the combined statement list.
fn load_and_check(entry: &Path, config: &LoaderConfig) -> Result<Vec<ast::Statement>, ToxError> {
    let statements = loader::load_program(entry, config)?;
    let diagnostics = typechecker::core::check(&statements);
    if !diagnostics.is_empty() {
        return Err(ToxError::Type(diagnostics));
    }
    Ok(statements)
}

/// Evaluates the top-level statements, then invokes `main` if present.
fn run_statements(statements: &[ast::Statement], context: &mut Context) -> Result<(), ToxError> {
    context.eval(statements).map_err(ToxError::Runtime)?;

    let main = match context.get_variable("main") {
        Some(Value::Function(decl)) => decl.clone(),
        _ => return Ok(()),
    };
    context.call_function(&main, Vec::new(), None).map_err(ToxError::Runtime)?;
    Ok(())
}
