//! Error handling.

use std::fmt;

/// A specialized [`Result`] type for graphics operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for all operations on a display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    /// Helper to check that error is [`ErrorKind::NotSupported`].
    #[inline]
    pub fn not_supported(&self) -> bool {
        matches!(&self.kind, ErrorKind::NotSupported(_))
    }

    /// The underlying error kind.
    #[inline]
    pub fn error_kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.as_str())
    }
}

impl std::error::Error for Error {}

/// Build an error with just a kind.
impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error { kind }
    }
}

/// A list specifying the general categories of errors, mirroring the
/// standardized error codes of the client-facing API.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum ErrorKind {
    /// The display has not been initialized, or initialization failed.
    NotInitialized,

    /// An unrecognized attribute or attribute value was passed.
    BadAttribute,

    /// Arguments are inconsistent. For example when a requested buffering
    /// mode contradicts the capability of the chosen config.
    BadMatch,

    /// The display connection is in an invalid state.
    BadDisplay,

    /// Argument does not name a valid config.
    BadConfig,

    /// Failed to obtain a valid context.
    BadContext,

    /// The surface is invalid or already destroyed.
    BadSurface,

    /// The operation is not supported by the platform.
    NotSupported(&'static str),

    /// The misc error that can't be classified occurred.
    Misc,
}

impl ErrorKind {
    pub(crate) fn as_str(&self) -> &'static str {
        use ErrorKind::*;
        match *self {
            NotInitialized => "display is not initialized",
            BadAttribute => "an unrecognized attribute or attribute value was passed",
            BadMatch => "arguments are inconsistent",
            BadDisplay => "argument does not name a valid display",
            BadConfig => "argument does not name a valid config",
            BadContext => "argument does not name a valid context",
            BadSurface => "argument does not name a valid surface",
            NotSupported(reason) => reason,
            Misc => "misc platform error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
