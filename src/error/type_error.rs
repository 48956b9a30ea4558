#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents the semantic diagnostics produced by the static type checker.
pub enum TypeError {
    /// A value's type does not match the type expected by its context.
    Mismatch {
        /// The type required by the context.
        expected: String,
        /// The type that was actually inferred.
        found:    String,
        /// The source line where the error occurred.
        line:     usize,
        /// The source column where the error occurred.
        col:      usize,
    },
    /// Used a variable that is not declared in any visible scope.
    UnknownVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
        /// The source column where the error occurred.
        col:  usize,
    },
    /// Called a function that is neither declared nor a builtin.
    UnknownFunction {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
        /// The source column where the error occurred.
        col:  usize,
    },
    /// Referenced a struct type that was never declared.
    UnknownStruct {
        /// The name of the struct type.
        name: String,
        /// The source line where the error occurred.
        line: usize,
        /// The source column where the error occurred.
        col:  usize,
    },
    /// A declared type is not part of the type grammar.
    UnknownType {
        /// The offending type string.
        name: String,
        /// The source line where the error occurred.
        line: usize,
        /// The source column where the error occurred.
        col:  usize,
    },
    /// Accessed a field that the struct definition does not declare.
    UnknownField {
        /// The struct type name.
        struct_name: String,
        /// The missing field.
        field:       String,
        /// The source line where the error occurred.
        line:        usize,
        /// The source column where the error occurred.
        col:         usize,
    },
    /// A struct literal omitted a declared field.
    MissingField {
        /// The struct type name.
        struct_name: String,
        /// The omitted field.
        field:       String,
        /// The source line where the error occurred.
        line:        usize,
        /// The source column where the error occurred.
        col:         usize,
    },
    /// Assigned to a variable that was never declared.
    UndeclaredAssignment {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
        /// The source column where the error occurred.
        col:  usize,
    },
    /// An operator was applied to operand types it is not defined for.
    InvalidOperands {
        /// The operator as written.
        operator: String,
        /// The left operand type.
        left:     String,
        /// The right operand type.
        right:    String,
        /// The source line where the error occurred.
        line:     usize,
        /// The source column where the error occurred.
        col:      usize,
    },
    /// The wrong number of arguments was supplied to a call.
    ArgumentCountMismatch {
        /// The callee name.
        name:     String,
        /// The number of parameters declared.
        expected: usize,
        /// The number of arguments supplied.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
        /// The source column where the error occurred.
        col:      usize,
    },
    /// A method was called on something that is not a struct.
    ReceiverNotStruct {
        /// The receiver expression's base name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
        /// The source column where the error occurred.
        col:  usize,
    },
    /// `break` or `continue` appeared outside of a loop body.
    SignalOutsideLoop {
        /// The keyword as written (`break` or `continue`).
        keyword: String,
        /// The source line where the error occurred.
        line:    usize,
        /// The source column where the error occurred.
        col:     usize,
    },
    /// A non-void function returned nothing, or a void function returned a
    /// value.
    BadReturn {
        /// Details about the violation.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
        /// The source column where the error occurred.
        col:     usize,
    },
    /// A dotted name's base does not have a struct type.
    NotAStruct {
        /// The base variable name.
        name: String,
        /// The type it actually has.
        found: String,
        /// The source line where the error occurred.
        line: usize,
        /// The source column where the error occurred.
        col:  usize,
    },
    /// The left-hand side of `>>` is not an assignable target.
    InvalidAssignmentTarget {
        /// The source line where the error occurred.
        line: usize,
        /// The source column where the error occurred.
        col:  usize,
    },
    /// A collection was indexed or sliced with the wrong types.
    NotIndexable {
        /// The type that was indexed.
        found: String,
        /// The source line where the error occurred.
        line:  usize,
        /// The source column where the error occurred.
        col:   usize,
    },
}

impl std::fmt::Display for TypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mismatch { expected,
                             found,
                             line,
                             col, } => {
                write!(f, "Type error on line {line}:{col}: expected {expected}, got {found}.")
            },
            Self::UnknownVariable { name, line, col } => {
                write!(f, "Type error on line {line}:{col}: unknown variable '{name}'.")
            },
            Self::UnknownFunction { name, line, col } => {
                write!(f, "Type error on line {line}:{col}: unknown function '{name}'.")
            },
            Self::UnknownStruct { name, line, col } => {
                write!(f, "Type error on line {line}:{col}: unknown struct '{name}'.")
            },
            Self::UnknownType { name, line, col } => {
                write!(f, "Type error on line {line}:{col}: unknown type '{name}'.")
            },
            Self::UnknownField { struct_name,
                                 field,
                                 line,
                                 col, } => {
                write!(f,
                       "Type error on line {line}:{col}: struct '{struct_name}' has no field \
                        '{field}'.")
            },
            Self::MissingField { struct_name,
                                 field,
                                 line,
                                 col, } => {
                write!(f,
                       "Type error on line {line}:{col}: struct literal for '{struct_name}' is \
                        missing field '{field}'.")
            },
            Self::UndeclaredAssignment { name, line, col } => {
                write!(f,
                       "Type error on line {line}:{col}: assignment to undeclared variable \
                        '{name}'.")
            },
            Self::InvalidOperands { operator,
                                    left,
                                    right,
                                    line,
                                    col, } => {
                write!(f,
                       "Type error on line {line}:{col}: operator '{operator}' is not defined \
                        for {left} and {right}.")
            },
            Self::ArgumentCountMismatch { name,
                                          expected,
                                          found,
                                          line,
                                          col, } => {
                write!(f,
                       "Type error on line {line}:{col}: '{name}' takes {expected} argument(s), \
                        got {found}.")
            },
            Self::ReceiverNotStruct { name, line, col } => {
                write!(f,
                       "Type error on line {line}:{col}: method receiver '{name}' is not a \
                        struct.")
            },
            Self::SignalOutsideLoop { keyword, line, col } => {
                write!(f, "Type error on line {line}:{col}: '{keyword}' outside of a loop.")
            },
            Self::BadReturn { details, line, col } => {
                write!(f, "Type error on line {line}:{col}: {details}.")
            },
            Self::NotAStruct { name,
                               found,
                               line,
                               col, } => {
                write!(f, "Type error on line {line}:{col}: '{name}' has type {found}, not a \
                           struct.")
            },
            Self::InvalidAssignmentTarget { line, col } => {
                write!(f, "Type error on line {line}:{col}: invalid assignment target.")
            },
            Self::NotIndexable { found, line, col } => {
                write!(f, "Type error on line {line}:{col}: type {found} cannot be indexed.")
            },
        }
    }
}

impl std::error::Error for TypeError {}
