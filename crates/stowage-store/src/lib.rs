//! Backend capability interface for Stowage.
//!
//! Everything Stowage needs from an object-storage backend is expressed as
//! the [`ObjectStore`] trait: bucket probing and creation, bucket policy
//! application, object CRUD, and presigned download/upload credentials.
//! The facade crate consumes the trait only, so backends are swappable and
//! the facade is unit-testable without network access.
//!
//! # Architecture
//!
//! ```text
//! stowage-core (facade)
//!        |
//!        v
//!   ObjectStore (this trait)
//!    /        \
//!   v          v
//! MemoryStore  S3Store (stowage-s3)
//! ```
//!
//! [`MemoryStore`] is a complete in-process implementation used by the unit
//! tests and handy for local development.

pub mod error;
pub mod memory;
pub mod types;

use async_trait::async_trait;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use types::{
    ObjectAttributes, PresignGetRequest, PresignPostRequest, PutObjectRequest, StoredObject,
    UploadPolicy,
};

/// Capability surface of an S3-compatible object-storage backend.
///
/// Implementations must be cheap to share behind an `Arc` and safe to call
/// concurrently. Cancellation is cooperative: dropping a returned future
/// abandons the call, and callers impose deadlines by wrapping calls in
/// `tokio::time::timeout`.
#[async_trait]
pub trait ObjectStore: std::fmt::Debug + Send + Sync {
    /// Probe whether a bucket exists.
    ///
    /// # Errors
    ///
    /// - [`StoreError::BucketNotFound`] when the bucket does not exist.
    /// - [`StoreError::Backend`] when the probe itself failed, which callers
    ///   must treat differently from absence.
    async fn head_bucket(&self, bucket: &str) -> StoreResult<()>;

    /// Create a bucket.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::BucketAlreadyExists`] when the bucket is
    /// already there; callers racing on creation rely on this being
    /// distinguishable from other failures.
    async fn create_bucket(&self, bucket: &str) -> StoreResult<()>;

    /// Attach an access policy document (JSON) to a bucket.
    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> StoreResult<()>;

    /// Store an object with its content type and user metadata.
    async fn put_object(&self, request: PutObjectRequest) -> StoreResult<()>;

    /// Fetch an object's bytes and attributes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ObjectNotFound`] when no object exists at the
    /// key.
    async fn get_object(&self, bucket: &str, key: &str) -> StoreResult<StoredObject>;

    /// Fetch an object's attributes without its bytes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ObjectNotFound`] when no object exists at the
    /// key.
    async fn head_object(&self, bucket: &str, key: &str) -> StoreResult<ObjectAttributes>;

    /// Delete an object.
    ///
    /// Whether deleting an absent key is an error is backend-defined:
    /// S3 treats it as success, [`MemoryStore`] reports
    /// [`StoreError::ObjectNotFound`].
    async fn delete_object(&self, bucket: &str, key: &str) -> StoreResult<()>;

    /// Produce a presigned download URL.
    async fn presign_get(&self, request: PresignGetRequest) -> StoreResult<String>;

    /// Produce a presigned POST upload policy.
    async fn presign_post(&self, request: PresignPostRequest) -> StoreResult<UploadPolicy>;
}
