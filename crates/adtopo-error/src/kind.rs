//! Error kinds for adtopo operations

use strum_macros::{Display, IntoStaticStr};

/// The kind of error that occurred.
///
/// This enum categorizes errors to help users write clear error handling logic.
/// Users can match on ErrorKind to decide how to handle specific error cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// An unexpected error occurred - catch-all for unhandled cases
    Unexpected,

    /// The requested feature or operation is not supported
    Unsupported,

    /// Invalid argument passed to function
    InvalidArgument,

    // =========================================================================
    // Directory-access errors
    // =========================================================================
    /// A directory entity could not be reached
    DirectoryUnreachable,

    /// The directory refused the read
    PermissionDenied,

    /// A directory entity was present but its data was malformed
    MalformedEntity,

    /// The traversal deadline expired before discovery finished
    Timeout,

    // =========================================================================
    // Graph errors
    // =========================================================================
    /// Graph construction failed
    GraphBuildFailed,

    /// An edge referenced a node that is not in the graph
    DanglingEndpoint,

    /// A graph store invariant was violated
    InvariantViolation,

    // =========================================================================
    // Serialization errors
    // =========================================================================
    /// Rendering the interchange document failed
    SerializationFailed,

    /// Reading a snapshot file failed to deserialize
    DeserializationFailed,

    // =========================================================================
    // File/IO errors
    // =========================================================================
    /// File not found
    FileNotFound,

    /// IO operation failed
    IoFailed,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// Check if this error kind is retryable by default
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::Timeout | ErrorKind::DirectoryUnreachable | ErrorKind::IoFailed
        )
    }
}
