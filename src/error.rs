use std::fmt;

/// Errors returned by graph builders and analysis kernels.
///
/// Grounded on `graphrs::error::Error` (a plain `{kind, message}` struct);
/// `ErrorKind` is extended with a contract-violation / numeric-degeneracy
/// taxonomy covering version mismatches, malformed input sizes, and
/// degenerate geometry.
#[derive(Debug, Clone)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Error {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Descriptor version mismatch between caller and kernel.
    VersionMismatch,
    /// An output array's length doesn't match the expected element count.
    SizeMismatch,
    /// A kernel was asked to use a distance type it does not support.
    UnsupportedDistanceType,
    /// Polygon point counts don't sum to the supplied point count.
    PolygonPointCountMismatch,
    /// Graph handle or node/edge reference could not be resolved.
    NotFound,
    /// Graph construction was given geometrically degenerate input.
    Degenerate,
}
