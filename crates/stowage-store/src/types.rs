//! Request and response types for the [`ObjectStore`] capability surface.
//!
//! These are plain value types: the facade builds them, backends consume
//! them, nothing holds onto them past the call.
//!
//! [`ObjectStore`]: crate::ObjectStore

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Parameters for storing an object.
#[derive(Debug, Clone)]
pub struct PutObjectRequest {
    /// Target bucket.
    pub bucket: String,
    /// Target key within the bucket.
    pub key: String,
    /// Raw object bytes.
    pub body: Bytes,
    /// MIME content type stored alongside the bytes.
    pub content_type: String,
    /// User metadata. Keys are expected lowercase; values must survive
    /// header transport, so non-ASCII content is percent-encoded by callers.
    pub metadata: HashMap<String, String>,
}

/// Attributes of a stored object, as returned by a head call.
#[derive(Debug, Clone)]
pub struct ObjectAttributes {
    /// Stored content type, if the backend recorded one.
    pub content_type: Option<String>,
    /// Object size in bytes.
    pub content_length: u64,
    /// User metadata with lowercase keys.
    pub metadata: HashMap<String, String>,
}

/// A fetched object: its bytes plus the attributes a head call would return.
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// Raw object bytes.
    pub body: Bytes,
    /// Attributes of the object.
    pub attributes: ObjectAttributes,
}

/// Parameters for presigning a download URL.
#[derive(Debug, Clone)]
pub struct PresignGetRequest {
    /// Bucket holding the object.
    pub bucket: String,
    /// Key of the object.
    pub key: String,
    /// How long the URL stays valid.
    pub expires_in: Duration,
    /// `Content-Disposition` the backend must send when the URL is redeemed.
    pub response_content_disposition: Option<String>,
    /// `Content-Type` the backend must send when the URL is redeemed.
    pub response_content_type: Option<String>,
}

/// Parameters for presigning a browser-upload POST policy.
#[derive(Debug, Clone)]
pub struct PresignPostRequest {
    /// Bucket the upload is bound to.
    pub bucket: String,
    /// Exact key the upload is bound to.
    pub key: String,
    /// Inclusive `(min, max)` bounds on the uploaded body size in bytes.
    pub content_length_range: (u64, u64),
    /// How long the policy stays valid.
    pub expires_in: Duration,
}

/// A presigned POST upload policy.
///
/// Opaque to everything above the store: the URL and form fields are handed
/// to the uploading client verbatim, which POSTs a multipart form with these
/// fields plus the file itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadPolicy {
    /// URL the client POSTs the form to.
    pub url: String,
    /// Form fields the client must include, including the signed policy
    /// document. Ordered so serialization is deterministic.
    pub fields: BTreeMap<String, String>,
}
