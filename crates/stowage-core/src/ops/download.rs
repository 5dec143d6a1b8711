//! Download operations.
//!
//! [`Stowage::issue_download_grant`] hands out a short-lived presigned URL
//! with the response headers pinned at issuance time;
//! [`Stowage::fetch_object`] pulls the bytes through the facade instead.
//! Both resolve display metadata before touching the body, so a missing
//! object surfaces as [`StowageError::ObjectNotFound`] rather than a
//! download failure.

use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use stowage_store::{PresignGetRequest, StoreError};
use tracing::debug;

use crate::address::{ADDRESS_SCHEME, ObjectAddress};
use crate::error::{StowageError, StowageResult};
use crate::metadata::{self, ResolvedMetadata};
use crate::provider::Stowage;

/// Validity of a download grant when the caller does not pick one.
pub const DEFAULT_DOWNLOAD_TTL: Duration = Duration::from_secs(300);

/// Shortest validity a download grant is ever issued with. Requests below
/// this are raised to it.
pub const MIN_DOWNLOAD_TTL: Duration = Duration::from_secs(10);

/// A redeemable download: the presigned URL plus everything a caller needs
/// to present the file without another round trip.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadGrant {
    /// Presigned GET URL.
    pub download_url: String,
    /// Resolved display file name.
    pub file_name: String,
    /// Resolved content type.
    pub content_type: String,
    /// The full address string the grant was issued for.
    pub arn: String,
    /// Bucket holding the object.
    pub bucket: String,
    /// Key of the object.
    pub key: String,
    /// Effective validity in seconds, after flooring.
    pub expires_in_seconds: u64,
    /// Instant the grant stops working.
    pub expires_at: DateTime<Utc>,
}

/// An object fetched through the facade.
#[derive(Debug, Clone)]
pub struct FetchedObject {
    /// The object's bytes.
    pub body: Bytes,
    /// Decoded display file name.
    pub file_name: String,
    /// Resolved content type.
    pub content_type: String,
}

impl Stowage {
    /// Recover the display file name and content type for a stored object.
    ///
    /// The name comes from the object's metadata when present, falling back
    /// to the key; an undecodable name is kept raw rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns [`StowageError::ObjectNotFound`] when nothing exists at the
    /// key.
    pub async fn resolve_metadata(
        &self,
        bucket: &str,
        key: &str,
    ) -> StowageResult<ResolvedMetadata> {
        let attributes = self
            .store
            .head_object(bucket, key)
            .await
            .map_err(object_error)?;
        Ok(metadata::resolve(&attributes, key))
    }

    /// Issue a presigned download URL for the object at `address`.
    ///
    /// The URL forces a `Content-Disposition` attachment carrying the
    /// resolved file name in both quoted and RFC 5987 forms, and pins the
    /// resolved `Content-Type`. Both are fixed at issuance; later metadata
    /// changes do not affect an outstanding grant. Validity defaults to
    /// five minutes and is floored to [`MIN_DOWNLOAD_TTL`].
    ///
    /// # Errors
    ///
    /// Returns [`StowageError::InvalidAddress`] for a malformed address and
    /// [`StowageError::ObjectNotFound`] when nothing exists there, plus
    /// anything [`Stowage::ensure_bucket`] or the backend signer can fail
    /// with.
    pub async fn issue_download_grant(
        &self,
        address: &str,
        expires_in: Option<Duration>,
    ) -> StowageResult<DownloadGrant> {
        let parsed = ObjectAddress::parse(address)?;
        self.ensure_bucket(parsed.bucket()).await?;
        let resolved = self.resolve_metadata(parsed.bucket(), parsed.key()).await?;

        let expires_in = expires_in
            .unwrap_or(DEFAULT_DOWNLOAD_TTL)
            .max(MIN_DOWNLOAD_TTL);
        let download_url = self
            .store
            .presign_get(PresignGetRequest {
                bucket: parsed.bucket().to_owned(),
                key: parsed.key().to_owned(),
                expires_in,
                response_content_disposition: Some(metadata::content_disposition(
                    &resolved.file_name,
                )),
                response_content_type: Some(resolved.content_type.clone()),
            })
            .await?;

        debug!(
            bucket = %parsed.bucket(),
            key = %parsed.key(),
            ttl_secs = expires_in.as_secs(),
            "issued download grant"
        );

        let arn = parsed.to_string();
        let (bucket, key) = parsed.into_parts();
        Ok(DownloadGrant {
            download_url,
            file_name: resolved.file_name,
            content_type: resolved.content_type,
            arn,
            bucket,
            key,
            expires_in_seconds: expires_in.as_secs(),
            expires_at: expires_at(Utc::now(), expires_in),
        })
    }

    /// Fetch the object at `address` through the facade.
    ///
    /// Unlike [`Stowage::issue_download_grant`], an undecodable stored file
    /// name is an error here rather than kept raw.
    ///
    /// # Errors
    ///
    /// Returns [`StowageError::InvalidAddress`] for a malformed address,
    /// [`StowageError::ObjectNotFound`] when nothing exists there, and
    /// [`StowageError::InvalidFileName`] when the stored name does not
    /// decode.
    pub async fn fetch_object(&self, address: &str) -> StowageResult<FetchedObject> {
        let parsed = validate_fetch_address(address)?;
        self.ensure_bucket(parsed.bucket()).await?;

        // Head before get so absence is detected before any bytes move.
        let attributes = self
            .store
            .head_object(parsed.bucket(), parsed.key())
            .await
            .map_err(object_error)?;
        let stored = self
            .store
            .get_object(parsed.bucket(), parsed.key())
            .await
            .map_err(object_error)?;
        let resolved = metadata::resolve_strict(&attributes, parsed.key())?;

        debug!(
            bucket = %parsed.bucket(),
            key = %parsed.key(),
            size = stored.body.len(),
            "fetched object"
        );
        Ok(FetchedObject {
            body: stored.body,
            file_name: resolved.file_name,
            content_type: resolved.content_type,
        })
    }
}

/// Validate the three address segments one at a time, so each failure mode
/// names the offending segment.
fn validate_fetch_address(value: &str) -> StowageResult<ObjectAddress> {
    let parts: Vec<&str> = value.split(':').collect();

    let scheme = parts.first().copied().unwrap_or_default();
    if scheme != ADDRESS_SCHEME {
        return Err(StowageError::InvalidAddress {
            value: value.to_owned(),
            reason: format!("unsupported service `{scheme}`"),
        });
    }

    let bucket = parts.get(1).copied().unwrap_or_default();
    if bucket.trim().is_empty() {
        return Err(StowageError::InvalidAddress {
            value: value.to_owned(),
            reason: "bucket segment is empty".to_owned(),
        });
    }

    let key = if parts.len() == 3 { parts[2] } else { "" };
    if key.trim().is_empty() {
        return Err(StowageError::InvalidAddress {
            value: value.to_owned(),
            reason: "object key segment is missing or empty".to_owned(),
        });
    }

    Ok(ObjectAddress::from_validated(bucket, key))
}

/// Missing objects get their own variant; everything else passes through.
fn object_error(err: StoreError) -> StowageError {
    match err {
        StoreError::ObjectNotFound { bucket, key } => StowageError::ObjectNotFound { bucket, key },
        other => StowageError::Store(other),
    }
}

/// Grant expiry instant, saturating instead of overflowing on absurd TTLs.
fn expires_at(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    let delta = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
    now.checked_add_signed(delta)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
