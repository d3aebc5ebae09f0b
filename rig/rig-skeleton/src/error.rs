//! Error types for skeleton construction.

use thiserror::Error;

/// Result type for skeleton operations.
pub type SkeletonResult<T> = Result<T, SkeletonError>;

/// Errors raised while building, tagging or loading a skeleton.
///
/// Every variant that concerns a joint carries its name, so a malformed
/// template points straight at the bad line.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SkeletonError {
    /// A joint with this name already exists.
    #[error("joint '{name}' is already defined")]
    DuplicateJoint {
        /// The repeated name.
        name: String,
    },

    /// A referenced joint does not exist.
    #[error("unknown joint '{name}'")]
    UnknownJoint {
        /// The missing name.
        name: String,
    },

    /// A second parentless joint was added.
    #[error("joint '{name}' has no parent, but '{root}' is already the root")]
    MultipleRoots {
        /// The rejected joint.
        name: String,
        /// The existing root.
        root: String,
    },

    /// A joint was declared the mirror of itself.
    #[error("joint '{name}' cannot be symmetric with itself")]
    SelfSymmetric {
        /// The joint.
        name: String,
    },

    /// A foot or fat tag names a joint that compression removed.
    #[error("joint '{name}' was collapsed during compression and cannot be tagged")]
    CollapsedJoint {
        /// The collapsed joint.
        name: String,
    },

    /// A pose does not have one position per compressed joint.
    #[error("pose has {got} positions, expected {expected}")]
    PoseLengthMismatch {
        /// Compressed joint count.
        expected: usize,
        /// Positions supplied.
        got: usize,
    },

    /// No built-in template has this name.
    #[error("unknown skeleton template '{name}'")]
    UnknownTemplate {
        /// The requested name.
        name: String,
    },

    /// A skeleton description line could not be used.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// I/O error while reading a skeleton description.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
