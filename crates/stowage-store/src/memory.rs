//! In-memory object store.
//!
//! [`MemoryStore`] implements the full [`ObjectStore`] surface against
//! process-local maps. It is the backend the unit tests run against and is
//! useful for local development where no S3 endpoint is available.
//!
//! Thread-safe via [`DashMap`] for buckets/objects and a
//! [`parking_lot::RwLock`] for each bucket's policy slot.
//!
//! Presigned URLs and POST policies are synthesized with the same observable
//! shape as S3's (query parameters, base64 policy document) but carry a
//! placeholder signature; they are not redeemable over the network.

use std::collections::HashMap;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::RwLock;
use tracing::trace;

use crate::ObjectStore;
use crate::error::{StoreError, StoreResult};
use crate::types::{
    ObjectAttributes, PresignGetRequest, PresignPostRequest, PutObjectRequest, StoredObject,
    UploadPolicy,
};

/// Host used in synthesized presigned URLs. The `.invalid` TLD is reserved,
/// so nothing can accidentally resolve it.
const MEMORY_HOST: &str = "memory.store.invalid";

/// Placeholder signature value in synthesized credentials.
const MEMORY_SIGNATURE: &str = "memorystore-unsigned";

/// A stored object: bytes plus the attributes a head call reports.
#[derive(Debug, Clone)]
struct StoredEntry {
    body: Bytes,
    content_type: String,
    metadata: HashMap<String, String>,
}

/// Per-bucket state: objects and the attached policy document.
#[derive(Debug, Default)]
struct MemoryBucket {
    objects: DashMap<String, StoredEntry>,
    policy: RwLock<Option<String>>,
}

/// In-memory [`ObjectStore`] implementation.
///
/// Deleting a missing key reports [`StoreError::ObjectNotFound`], like a
/// filesystem unlink; S3 itself would report success. Code exercising batch
/// deletion against this store can therefore observe per-item failures.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use stowage_store::{MemoryStore, ObjectStore, PutObjectRequest};
///
/// # tokio_test::block_on(async {
/// let store = MemoryStore::new();
/// store.create_bucket("media").await.unwrap();
/// store
///     .put_object(PutObjectRequest {
///         bucket: "media".to_owned(),
///         key: "hello.txt".to_owned(),
///         body: Bytes::from("hello"),
///         content_type: "text/plain".to_owned(),
///         metadata: std::collections::HashMap::new(),
///     })
///     .await
///     .unwrap();
///
/// let stored = store.get_object("media", "hello.txt").await.unwrap();
/// assert_eq!(stored.body.as_ref(), b"hello");
/// # });
/// ```
#[derive(Default)]
pub struct MemoryStore {
    buckets: DashMap<String, MemoryBucket>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("bucket_count", &self.buckets.len())
            .finish()
    }
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of buckets currently held.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Whether an object exists at `bucket`/`key`.
    #[must_use]
    pub fn contains_object(&self, bucket: &str, key: &str) -> bool {
        self.buckets
            .get(bucket)
            .is_some_and(|b| b.objects.contains_key(key))
    }

    /// The policy document attached to a bucket, if any.
    #[must_use]
    pub fn bucket_policy(&self, bucket: &str) -> Option<String> {
        self.buckets.get(bucket).and_then(|b| b.policy.read().clone())
    }

    fn attributes_of(entry: &StoredEntry) -> ObjectAttributes {
        ObjectAttributes {
            content_type: Some(entry.content_type.clone()),
            content_length: entry.body.len() as u64,
            metadata: entry.metadata.clone(),
        }
    }

    /// Expiration instant for a synthesized credential, saturating instead
    /// of overflowing on absurd durations.
    fn expiration(expires_in: std::time::Duration) -> DateTime<Utc> {
        let delta = chrono::Duration::from_std(expires_in).unwrap_or(chrono::Duration::MAX);
        Utc::now()
            .checked_add_signed(delta)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn head_bucket(&self, bucket: &str) -> StoreResult<()> {
        if self.buckets.contains_key(bucket) {
            Ok(())
        } else {
            Err(StoreError::BucketNotFound {
                bucket: bucket.to_owned(),
            })
        }
    }

    async fn create_bucket(&self, bucket: &str) -> StoreResult<()> {
        // Entry API keeps check-and-insert atomic under concurrent creates.
        match self.buckets.entry(bucket.to_owned()) {
            Entry::Occupied(_) => Err(StoreError::BucketAlreadyExists {
                bucket: bucket.to_owned(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(MemoryBucket::default());
                trace!(bucket, "created bucket");
                Ok(())
            }
        }
    }

    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> StoreResult<()> {
        let entry = self
            .buckets
            .get(bucket)
            .ok_or_else(|| StoreError::BucketNotFound {
                bucket: bucket.to_owned(),
            })?;
        *entry.policy.write() = Some(policy.to_owned());
        Ok(())
    }

    async fn put_object(&self, request: PutObjectRequest) -> StoreResult<()> {
        let entry = self
            .buckets
            .get(&request.bucket)
            .ok_or_else(|| StoreError::BucketNotFound {
                bucket: request.bucket.clone(),
            })?;

        trace!(
            bucket = %request.bucket,
            key = %request.key,
            size = request.body.len(),
            "stored object"
        );
        entry.objects.insert(
            request.key,
            StoredEntry {
                body: request.body,
                content_type: request.content_type,
                metadata: request.metadata,
            },
        );
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> StoreResult<StoredObject> {
        let entry = self
            .buckets
            .get(bucket)
            .ok_or_else(|| StoreError::BucketNotFound {
                bucket: bucket.to_owned(),
            })?;
        let stored = entry.objects.get(key).ok_or_else(|| StoreError::ObjectNotFound {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
        })?;

        Ok(StoredObject {
            body: stored.body.clone(),
            attributes: Self::attributes_of(&stored),
        })
    }

    async fn head_object(&self, bucket: &str, key: &str) -> StoreResult<ObjectAttributes> {
        let entry = self
            .buckets
            .get(bucket)
            .ok_or_else(|| StoreError::BucketNotFound {
                bucket: bucket.to_owned(),
            })?;
        let stored = entry.objects.get(key).ok_or_else(|| StoreError::ObjectNotFound {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
        })?;

        Ok(Self::attributes_of(&stored))
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StoreResult<()> {
        let entry = self
            .buckets
            .get(bucket)
            .ok_or_else(|| StoreError::BucketNotFound {
                bucket: bucket.to_owned(),
            })?;
        entry
            .objects
            .remove(key)
            .ok_or_else(|| StoreError::ObjectNotFound {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
            })?;
        trace!(bucket, key, "deleted object");
        Ok(())
    }

    async fn presign_get(&self, request: PresignGetRequest) -> StoreResult<String> {
        // Presigning is a local computation; like S3, it does not verify
        // that the object exists.
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(disposition) = &request.response_content_disposition {
            query.append_pair("response-content-disposition", disposition);
        }
        if let Some(content_type) = &request.response_content_type {
            query.append_pair("response-content-type", content_type);
        }
        query.append_pair(
            "X-Amz-Expires",
            &request.expires_in.as_secs().to_string(),
        );
        query.append_pair("X-Amz-Signature", MEMORY_SIGNATURE);

        Ok(format!(
            "https://{MEMORY_HOST}/{}/{}?{}",
            request.bucket,
            request.key,
            query.finish()
        ))
    }

    async fn presign_post(&self, request: PresignPostRequest) -> StoreResult<UploadPolicy> {
        let expiration = Self::expiration(request.expires_in);
        let (min, max) = request.content_length_range;
        let document = serde_json::json!({
            "expiration": expiration.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            "conditions": [
                {"bucket": request.bucket},
                {"key": request.key},
                ["content-length-range", min, max],
            ],
        });

        let mut fields = std::collections::BTreeMap::new();
        fields.insert("key".to_owned(), request.key);
        fields.insert("policy".to_owned(), BASE64.encode(document.to_string()));
        fields.insert("x-amz-signature".to_owned(), MEMORY_SIGNATURE.to_owned());

        Ok(UploadPolicy {
            url: format!("https://{MEMORY_HOST}/{}", request.bucket),
            fields,
        })
    }
}
