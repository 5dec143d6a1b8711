//! Upload operations.
//!
//! Two ways in: [`Stowage::issue_upload_policy`] hands the caller a signed
//! POST policy so the client uploads directly to the backend, and
//! [`Stowage::write_object`] pushes bytes through the facade itself. Both
//! provision the bucket and assign a freshly generated object key; neither
//! ever derives the key from caller input.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use stowage_store::{PresignPostRequest, PutObjectRequest, UploadPolicy};
use tracing::{debug, warn};
use typed_builder::TypedBuilder;

use crate::address::ObjectAddress;
use crate::error::{StowageError, StowageResult};
use crate::metadata::{self, DEFAULT_CONTENT_TYPE, FILE_NAME_KEY, FILE_SIZE_KEY};
use crate::provider::Stowage;

/// Validity of an issued upload policy when the caller does not pick one.
pub const DEFAULT_UPLOAD_TTL: Duration = Duration::from_secs(3600);

/// A signed upload: the policy to relay to the uploader, and the address
/// the object will have once the upload completes.
///
/// The address is reserved, not yet backed by an object; nothing exists at
/// it until the client redeems the policy.
#[derive(Debug, Clone)]
pub struct IssuedUpload {
    /// Presigned POST policy, passed through to the uploader verbatim.
    pub policy: UploadPolicy,
    /// Address the uploaded object will be stored under.
    pub address: ObjectAddress,
}

/// A direct upload through the facade.
#[derive(Debug, Clone, TypedBuilder)]
pub struct WriteRequest {
    /// Destination bucket.
    pub bucket: String,

    /// Optional key prefix; the generated key is nested under it.
    #[builder(default)]
    pub scope: Option<String>,

    /// Object bytes.
    pub body: Bytes,

    /// Original file name, stored percent-encoded in object metadata.
    #[builder(default)]
    pub file_name: Option<String>,

    /// File size as reported by the uploader, stored in object metadata.
    #[builder(default)]
    pub file_size: Option<u64>,

    /// Declared content type.
    #[builder(default = String::from(DEFAULT_CONTENT_TYPE))]
    pub content_type: String,
}

impl Stowage {
    /// Issue a presigned POST policy for a direct client-side upload.
    ///
    /// The policy is bound to a freshly generated key (nested under `scope`
    /// when one is given), constrained to body sizes between one byte and
    /// the configured maximum, and valid for `expires_in` (default one
    /// hour, no clamping).
    ///
    /// # Errors
    ///
    /// Returns [`StowageError::InvalidRequest`] for a blank bucket before
    /// any backend call, plus anything [`Stowage::ensure_bucket`] or the
    /// backend's signer can fail with.
    pub async fn issue_upload_policy(
        &self,
        bucket: &str,
        scope: Option<&str>,
        expires_in: Option<Duration>,
    ) -> StowageResult<IssuedUpload> {
        if bucket.trim().is_empty() {
            return Err(StowageError::InvalidRequest {
                message: "bucket name must not be empty".to_owned(),
            });
        }

        self.ensure_bucket(bucket).await?;

        let address = ObjectAddress::new(bucket, self.next_key(scope))?;
        let expires_in = expires_in.unwrap_or(DEFAULT_UPLOAD_TTL);
        let policy = self
            .store
            .presign_post(PresignPostRequest {
                bucket: address.bucket().to_owned(),
                key: address.key().to_owned(),
                content_length_range: (1, self.config.max_size_bytes()),
                expires_in,
            })
            .await?;

        debug!(
            bucket,
            key = %address.key(),
            ttl_secs = expires_in.as_secs(),
            "issued upload policy"
        );
        Ok(IssuedUpload { policy, address })
    }

    /// Store `request.body` under a freshly generated key.
    ///
    /// The bucket is provisioned first, then the body size is checked
    /// against the configured limit, and finally the object is persisted
    /// with its file name (percent-encoded) and reported size in metadata.
    ///
    /// # Errors
    ///
    /// Returns [`StowageError::FileTooLarge`] when the body exceeds the
    /// configured maximum, plus anything [`Stowage::ensure_bucket`] or the
    /// backend write can fail with.
    pub async fn write_object(&self, request: WriteRequest) -> StowageResult<ObjectAddress> {
        self.ensure_bucket(&request.bucket).await?;

        let address = ObjectAddress::new(request.bucket, self.next_key(request.scope.as_deref()))?;

        let limit = self.config.max_size_bytes();
        let actual_bytes = request.body.len() as u64;
        if actual_bytes > limit {
            return Err(StowageError::FileTooLarge {
                limit_mb: self.config.max_size_mb,
                actual_bytes,
            });
        }
        if !self.config.is_mime_allowed(&request.content_type) {
            warn!(
                content_type = %request.content_type,
                "content type is outside the configured allow-list"
            );
        }

        let mut object_metadata = HashMap::new();
        object_metadata.insert(
            FILE_NAME_KEY.to_owned(),
            request
                .file_name
                .as_deref()
                .map(metadata::encode_file_name)
                .unwrap_or_default(),
        );
        object_metadata.insert(
            FILE_SIZE_KEY.to_owned(),
            request
                .file_size
                .map(|size| size.to_string())
                .unwrap_or_default(),
        );

        self.store
            .put_object(PutObjectRequest {
                bucket: address.bucket().to_owned(),
                key: address.key().to_owned(),
                body: request.body,
                content_type: request.content_type,
                metadata: object_metadata,
            })
            .await?;

        debug!(
            bucket = %address.bucket(),
            key = %address.key(),
            size = actual_bytes,
            "wrote object"
        );
        Ok(address)
    }

    /// Next object key: a generated token, nested under `scope` when one is
    /// given. An empty scope counts as absent.
    fn next_key(&self, scope: Option<&str>) -> String {
        let token = self.keys.generate_key();
        match scope {
            Some(scope) if !scope.is_empty() => format!("{scope}/{token}"),
            _ => token,
        }
    }
}
