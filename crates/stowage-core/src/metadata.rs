//! Object metadata resolution.
//!
//! Uploads record the original file name percent-encoded under the
//! [`FILE_NAME_KEY`] metadata entry. Resolution walks a fallback chain to
//! recover a display name for download responses:
//!
//! 1. the `x-file-name` metadata value,
//! 2. the older `file-name` metadata value,
//! 3. the last `/`-separated segment of the object key,
//! 4. the object key itself.
//!
//! Empty values do not satisfy a step; the chain moves on. The selected
//! value is then percent-decoded. [`resolve`] falls back to the raw value
//! when decoding fails, [`resolve_strict`] reports the failure instead.

use std::collections::HashMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use stowage_store::ObjectAttributes;

use crate::error::{StowageError, StowageResult};

/// Metadata key holding the percent-encoded original file name.
pub const FILE_NAME_KEY: &str = "x-file-name";

/// Metadata key holding the original file size in bytes, as a decimal string.
pub const FILE_SIZE_KEY: &str = "x-file-size";

/// Older file name metadata key still honored on reads.
pub const LEGACY_FILE_NAME_KEY: &str = "file-name";

/// Content type assumed when the stored object does not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

// Everything except ASCII alphanumerics and - _ . ! ~ * ' ( ) is encoded,
// matching what browsers produce for file name form fields.
const FILE_NAME_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Display name and content type recovered for a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMetadata {
    /// Decoded file name.
    pub file_name: String,
    /// Declared content type, or [`DEFAULT_CONTENT_TYPE`].
    pub content_type: String,
}

/// Percent-encode a file name for storage in object metadata.
#[must_use]
pub fn encode_file_name(raw: &str) -> String {
    utf8_percent_encode(raw, FILE_NAME_SET).to_string()
}

/// Percent-decode a stored file name, keeping the raw value when the decoded
/// bytes are not valid UTF-8.
#[must_use]
pub fn decode_file_name(encoded: &str) -> String {
    percent_decode_str(encoded)
        .decode_utf8()
        .map_or_else(|_| encoded.to_owned(), |decoded| decoded.into_owned())
}

/// Percent-decode a stored file name.
///
/// # Errors
///
/// Returns [`StowageError::InvalidFileName`] when the decoded bytes are not
/// valid UTF-8.
pub fn decode_file_name_strict(encoded: &str) -> StowageResult<String> {
    percent_decode_str(encoded)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| StowageError::InvalidFileName {
            raw: encoded.to_owned(),
        })
}

/// Resolve the display metadata for an object, tolerating undecodable names.
#[must_use]
pub fn resolve(attributes: &ObjectAttributes, key: &str) -> ResolvedMetadata {
    ResolvedMetadata {
        file_name: decode_file_name(select_raw_file_name(&attributes.metadata, key)),
        content_type: declared_content_type(attributes),
    }
}

/// Resolve the display metadata for an object, rejecting undecodable names.
///
/// # Errors
///
/// Returns [`StowageError::InvalidFileName`] when the selected name does not
/// decode to valid UTF-8.
pub fn resolve_strict(attributes: &ObjectAttributes, key: &str) -> StowageResult<ResolvedMetadata> {
    Ok(ResolvedMetadata {
        file_name: decode_file_name_strict(select_raw_file_name(&attributes.metadata, key))?,
        content_type: declared_content_type(attributes),
    })
}

/// `Content-Disposition` header value carrying the file name in both the
/// quoted legacy form and the RFC 5987 `filename*` form.
#[must_use]
pub fn content_disposition(file_name: &str) -> String {
    format!(
        "attachment; filename=\"{file_name}\"; filename*=UTF-8''{}",
        encode_file_name(file_name)
    )
}

fn declared_content_type(attributes: &ObjectAttributes) -> String {
    attributes
        .content_type
        .clone()
        .filter(|ct| !ct.is_empty())
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_owned())
}

fn select_raw_file_name<'a>(metadata: &'a HashMap<String, String>, key: &'a str) -> &'a str {
    metadata
        .get(FILE_NAME_KEY)
        .filter(|name| !name.is_empty())
        .or_else(|| metadata.get(LEGACY_FILE_NAME_KEY).filter(|name| !name.is_empty()))
        .map_or_else(|| last_key_segment(key), String::as_str)
}

fn last_key_segment(key: &str) -> &str {
    key.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or(key)
}
