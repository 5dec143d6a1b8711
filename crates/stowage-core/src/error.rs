//! Error types for Stowage operations.
//!
//! [`StowageError`] covers everything the facade can reject on its own
//! (malformed addresses, oversized uploads) plus failures surfaced by the
//! backing store. Backend errors that have a meaning at this level, such as
//! a missing object, get their own variant; everything else passes through
//! as [`StowageError::Store`].

use stowage_store::StoreError;
use thiserror::Error;

/// Convenience alias for results produced by Stowage operations.
pub type StowageResult<T> = Result<T, StowageError>;

/// Errors returned by Stowage operations.
#[derive(Debug, Error)]
pub enum StowageError {
    // -------------------------------------------------------------------
    // Caller-side rejections
    // -------------------------------------------------------------------
    /// An object address string could not be parsed.
    #[error("invalid object address `{value}`: {reason}")]
    InvalidAddress {
        /// The address string as supplied by the caller.
        value: String,
        /// What made it unacceptable.
        reason: String,
    },

    /// A request was rejected before reaching the backend.
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// What was wrong with the request.
        message: String,
    },

    /// An upload body exceeded the configured size limit.
    #[error("file of {actual_bytes} bytes exceeds the {limit_mb} MB upload limit")]
    FileTooLarge {
        /// The configured limit, in megabytes.
        limit_mb: u64,
        /// The size of the rejected body, in bytes.
        actual_bytes: u64,
    },

    // -------------------------------------------------------------------
    // Backend-surfaced failures
    // -------------------------------------------------------------------
    /// A bucket existence probe failed for a reason other than absence.
    #[error("failed to provision bucket `{bucket}`")]
    Provisioning {
        /// The bucket being provisioned.
        bucket: String,
        /// The underlying store failure.
        #[source]
        source: StoreError,
    },

    /// The addressed object does not exist.
    #[error("object `{key}` not found in bucket `{bucket}`")]
    ObjectNotFound {
        /// Bucket that was probed.
        bucket: String,
        /// Key that was probed.
        key: String,
    },

    /// Stored file name metadata did not decode to valid UTF-8.
    #[error("file name metadata `{raw}` is not valid percent-encoded UTF-8")]
    InvalidFileName {
        /// The raw metadata value that failed to decode.
        raw: String,
    },

    /// Any other store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl StowageError {
    /// Returns `true` if this error means the addressed object is absent,
    /// whether detected here or reported by the store.
    #[must_use]
    pub fn is_object_not_found(&self) -> bool {
        match self {
            Self::ObjectNotFound { .. } => true,
            Self::Store(err) => err.is_object_not_found(),
            _ => false,
        }
    }
}
