//! Object addressing.
//!
//! Every stored object is identified by an address string of the form
//! `s3:bucket:objectKey`. [`ObjectAddress`] is the parsed form; it keeps the
//! bucket and key segments exactly as written (surrounding whitespace
//! included) and only insists that both are non-empty once trimmed.

use std::fmt;
use std::str::FromStr;

use crate::error::{StowageError, StowageResult};

/// Scheme prefix of every object address.
pub const ADDRESS_SCHEME: &str = "s3";

/// A parsed `s3:bucket:objectKey` address.
///
/// # Examples
///
/// ```
/// use stowage_core::ObjectAddress;
///
/// let address = ObjectAddress::parse("s3:media:images/cat.png").unwrap();
/// assert_eq!(address.bucket(), "media");
/// assert_eq!(address.key(), "images/cat.png");
/// assert_eq!(address.to_string(), "s3:media:images/cat.png");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectAddress {
    bucket: String,
    key: String,
}

impl ObjectAddress {
    /// Build an address from a bucket and key.
    ///
    /// Both segments are stored verbatim. Validation rejects segments that
    /// are empty after trimming, and keys containing `:`, which could not
    /// survive a round trip through the string form.
    ///
    /// # Errors
    ///
    /// Returns [`StowageError::InvalidAddress`] if either segment is blank
    /// or the key contains `:`.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> StowageResult<Self> {
        let bucket = bucket.into();
        let key = key.into();
        if bucket.trim().is_empty() {
            return Err(invalid(
                format!("{ADDRESS_SCHEME}:{bucket}:{key}"),
                "bucket segment is empty",
            ));
        }
        if key.trim().is_empty() {
            return Err(invalid(
                format!("{ADDRESS_SCHEME}:{bucket}:{key}"),
                "key segment is empty",
            ));
        }
        if key.contains(':') {
            return Err(invalid(
                format!("{ADDRESS_SCHEME}:{bucket}:{key}"),
                "key segment must not contain `:`",
            ));
        }
        Ok(Self { bucket, key })
    }

    /// Parse an `s3:bucket:objectKey` string.
    ///
    /// The string must split on `:` into exactly three parts, the first of
    /// which is the literal scheme `s3`. The bucket and key parts are kept
    /// verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`StowageError::InvalidAddress`] when the part count is wrong,
    /// the scheme is not `s3`, or a segment is blank.
    pub fn parse(value: &str) -> StowageResult<Self> {
        let parts: Vec<&str> = value.split(':').collect();
        if parts.len() != 3 {
            return Err(invalid(
                value,
                format!("expected 3 colon-separated parts, found {}", parts.len()),
            ));
        }
        if parts[0] != ADDRESS_SCHEME {
            return Err(invalid(
                value,
                format!("expected scheme `{ADDRESS_SCHEME}`, found `{}`", parts[0]),
            ));
        }
        if parts[1].trim().is_empty() {
            return Err(invalid(value, "bucket segment is empty"));
        }
        if parts[2].trim().is_empty() {
            return Err(invalid(value, "key segment is empty"));
        }
        Ok(Self {
            bucket: parts[1].to_owned(),
            key: parts[2].to_owned(),
        })
    }

    /// The bucket segment, exactly as written.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The key segment, exactly as written.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Consume the address, yielding `(bucket, key)`.
    #[must_use]
    pub fn into_parts(self) -> (String, String) {
        (self.bucket, self.key)
    }

    /// Build an address out of segments that were already validated.
    pub(crate) fn from_validated(bucket: &str, key: &str) -> Self {
        Self {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
        }
    }
}

impl fmt::Display for ObjectAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ADDRESS_SCHEME}:{}:{}", self.bucket, self.key)
    }
}

impl FromStr for ObjectAddress {
    type Err = StowageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn invalid(value: impl Into<String>, reason: impl Into<String>) -> StowageError {
    StowageError::InvalidAddress {
        value: value.into(),
        reason: reason.into(),
    }
}
