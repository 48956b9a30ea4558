use crate::error::ParseError;

#[derive(Debug)]
/// Represents all errors that can occur while composing a multi-file program.
pub enum LoadError {
    /// A source file or directory could not be read.
    Io {
        /// The path that failed.
        path:   String,
        /// The underlying I/O error message.
        source: std::io::Error,
    },
    /// A file failed to parse; all of its parse errors are carried.
    Parse {
        /// The path of the file.
        path:   String,
        /// The accumulated parse errors.
        errors: Vec<ParseError>,
    },
    /// Two files of the same directory declare different packages.
    PackageMismatch {
        /// The directory holding the files.
        dir:    String,
        /// The first declared package name.
        first:  String,
        /// The conflicting declared package name.
        second: String,
    },
    /// A file's declared package does not match its directory path.
    PackageNameMismatch {
        /// The declared package name.
        declared: String,
        /// The package name expected from the path.
        expected: String,
    },
    /// An import's head file was not found under any source directory.
    ImportNotFound {
        /// The dotted import path as written.
        path: String,
    },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "Failed to read '{path}': {source}."),
            Self::Parse { path, errors } => {
                writeln!(f, "Parse errors in '{path}':")?;
                for e in errors {
                    writeln!(f, "  - {e}")?;
                }
                Ok(())
            },
            Self::PackageMismatch { dir, first, second } => {
                write!(f,
                       "Package mismatch in directory '{dir}': found '{first}' and '{second}'.")
            },
            Self::PackageNameMismatch { declared, expected } => {
                write!(f,
                       "Package name mismatch: file declares '{declared}', but expected \
                        '{expected}' based on its directory.")
            },
            Self::ImportNotFound { path } => write!(f, "Import not found: {path}."),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
