//! Error types for backend store operations.
//!
//! Defines [`StoreError`], the error enum shared by every [`ObjectStore`]
//! implementation. The variants distinguish the outcomes callers branch on
//! (bucket or object absence, bucket collisions) from everything else, which
//! is wrapped untouched in [`StoreError::Backend`].
//!
//! [`ObjectStore`]: crate::ObjectStore

/// Error produced by an object store backend.
///
/// Implementations map their native error surface onto these variants so the
/// facade can react uniformly regardless of the concrete backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The bucket does not exist.
    #[error("bucket does not exist: {bucket}")]
    BucketNotFound {
        /// The bucket name that was probed.
        bucket: String,
    },

    /// The bucket already exists (create collided with a concurrent create
    /// or an earlier one).
    #[error("bucket already exists: {bucket}")]
    BucketAlreadyExists {
        /// The bucket name that collided.
        bucket: String,
    },

    /// The object does not exist at the given key.
    #[error("object does not exist: {bucket}/{key}")]
    ObjectNotFound {
        /// The bucket that was queried.
        bucket: String,
        /// The key that was not found.
        key: String,
    },

    /// Transport or backend failure that does not fit a specific variant.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    /// Whether this error reports a missing bucket.
    #[must_use]
    pub fn is_bucket_not_found(&self) -> bool {
        matches!(self, Self::BucketNotFound { .. })
    }

    /// Whether this error reports a missing object.
    #[must_use]
    pub fn is_object_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound { .. })
    }
}

/// Convenience result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
