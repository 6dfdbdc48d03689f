//! Error types for libpkgconfig.

use std::io;
use std::path::PathBuf;

/// Result type alias for libpkgconfig operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while locating, parsing, or querying packages.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A `.pc` file could not be parsed.
    #[error("Couldn't parse '{path}', line {line}: {message}")]
    ParseError {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A requested package was not found on the search path.
    #[error("Package {name} was not found in the pkg-config search path")]
    NotFound { name: String },

    /// A package was found but is missing a required property.
    #[error("Package '{path}' is invalid: {message}")]
    Invalid { path: PathBuf, message: String },

    /// A package was found but its version did not satisfy a constraint.
    #[error(
        "Requested '{name} {comparator} {required}' but version of {name} is {found}"
    )]
    VersionMismatch {
        name: String,
        found: String,
        required: String,
        comparator: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A malformed command-line argument.
    #[error("{message}")]
    ArgumentError { message: String },
}
