#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur during evaluation.
///
/// A program that passed the type checker never produces these; they exist
/// for callers that evaluate an unchecked statement list directly.
pub enum RuntimeError {
    /// Tried to use an undefined variable.
    UnknownVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Called an unknown function.
    UnknownFunction {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Called a value that is not a function.
    NotAFunction {
        /// The name that was called.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Accessed a field on a value that is not a struct.
    NotAStruct {
        /// The name of the base variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Accessed a field that the struct value does not carry.
    FieldNotFound {
        /// The name of the base variable.
        name:  String,
        /// The missing field.
        field: String,
        /// The source line where the error occurred.
        line:  usize,
    },
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownVariable { name, line } => {
                write!(f, "Error on line {line}: Unknown variable '{name}'.")
            },
            Self::UnknownFunction { name, line } => {
                write!(f, "Error on line {line}: Unknown function '{name}'.")
            },
            Self::NotAFunction { name, line } => {
                write!(f, "Error on line {line}: '{name}' is not a function.")
            },
            Self::NotAStruct { name, line } => {
                write!(f, "Error on line {line}: Variable '{name}' is not a struct.")
            },
            Self::FieldNotFound { name, field, line } => {
                write!(f, "Error on line {line}: Field '{field}' not found in '{name}'.")
            },
        }
    }
}

impl std::error::Error for RuntimeError {}
