//! Shared test doubles for operation tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use stowage_store::{
    MemoryStore, ObjectAttributes, ObjectStore, PresignGetRequest, PresignPostRequest,
    PutObjectRequest, StoreError, StoreResult, StoredObject, UploadPolicy,
};

/// [`ObjectStore`] wrapper that injects failures around a [`MemoryStore`].
#[derive(Debug, Default)]
pub(crate) struct FaultStore {
    pub(crate) inner: MemoryStore,
    /// Fail every `head_bucket` with a backend error.
    pub(crate) fail_head_bucket: bool,
    /// Report a creation collision instead of creating.
    pub(crate) collide_on_create: bool,
    /// Fail every `put_bucket_policy` with a backend error.
    pub(crate) fail_put_policy: bool,
    /// Number of `head_bucket` calls observed.
    pub(crate) head_bucket_calls: AtomicUsize,
}

#[async_trait]
impl ObjectStore for FaultStore {
    async fn head_bucket(&self, bucket: &str) -> StoreResult<()> {
        self.head_bucket_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_head_bucket {
            return Err(StoreError::Backend(anyhow::anyhow!("probe exploded")));
        }
        self.inner.head_bucket(bucket).await
    }

    async fn create_bucket(&self, bucket: &str) -> StoreResult<()> {
        if self.collide_on_create {
            // Model a concurrent creator winning the race: the bucket ends
            // up existing, but our create reports a collision.
            let _ = self.inner.create_bucket(bucket).await;
            return Err(StoreError::BucketAlreadyExists {
                bucket: bucket.to_owned(),
            });
        }
        self.inner.create_bucket(bucket).await
    }

    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> StoreResult<()> {
        if self.fail_put_policy {
            return Err(StoreError::Backend(anyhow::anyhow!("policy rejected")));
        }
        self.inner.put_bucket_policy(bucket, policy).await
    }

    async fn put_object(&self, request: PutObjectRequest) -> StoreResult<()> {
        self.inner.put_object(request).await
    }

    async fn get_object(&self, bucket: &str, key: &str) -> StoreResult<StoredObject> {
        self.inner.get_object(bucket, key).await
    }

    async fn head_object(&self, bucket: &str, key: &str) -> StoreResult<ObjectAttributes> {
        self.inner.head_object(bucket, key).await
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StoreResult<()> {
        self.inner.delete_object(bucket, key).await
    }

    async fn presign_get(&self, request: PresignGetRequest) -> StoreResult<String> {
        self.inner.presign_get(request).await
    }

    async fn presign_post(&self, request: PresignPostRequest) -> StoreResult<UploadPolicy> {
        self.inner.presign_post(request).await
    }
}
