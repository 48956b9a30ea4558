#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur during lexing or parsing.
pub enum ParseError {
    /// Found an unexpected token while parsing.
    UnexpectedToken {
        /// A description of what was found (and often what was expected).
        token: String,
        /// The source line where the error occurred.
        line:  usize,
        /// The source column where the error occurred.
        col:   usize,
    },
    /// The lexer produced an illegal character or sequence.
    IllegalToken {
        /// The offending source text.
        text: String,
        /// The source line where the error occurred.
        line: usize,
        /// The source column where the error occurred.
        col:  usize,
    },
    /// Reached the end of input unexpectedly.
    UnexpectedEndOfInput {
        /// The source line where the error occurred.
        line: usize,
        /// The source column where the error occurred.
        col:  usize,
    },
    /// An integer literal did not fit into 64 bits.
    InvalidIntLiteral {
        /// The literal text.
        text: String,
        /// The source line where the error occurred.
        line: usize,
        /// The source column where the error occurred.
        col:  usize,
    },
}

impl ParseError {
    /// Gets the `line:col` position carried by the error.
    #[must_use]
    pub const fn position(&self) -> (usize, usize) {
        match self {
            Self::UnexpectedToken { line, col, .. }
            | Self::IllegalToken { line, col, .. }
            | Self::UnexpectedEndOfInput { line, col }
            | Self::InvalidIntLiteral { line, col, .. } => (*line, *col),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedToken { token, line, col } => {
                write!(f, "Error on line {line}:{col}: {token}.")
            },
            Self::IllegalToken { text, line, col } => {
                write!(f, "Error on line {line}:{col}: Illegal character '{text}'.")
            },
            Self::UnexpectedEndOfInput { line, col } => {
                write!(f, "Error on line {line}:{col}: Unexpected end of input.")
            },
            Self::InvalidIntLiteral { text, line, col } => {
                write!(f, "Error on line {line}:{col}: Invalid int literal '{text}'.")
            },
        }
    }
}

impl std::error::Error for ParseError {}
