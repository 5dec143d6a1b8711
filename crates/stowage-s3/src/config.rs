//! S3 backend configuration.
//!
//! Provides [`S3StoreConfig`] for pointing [`S3Store`](crate::S3Store) at an
//! endpoint. Works against AWS itself (leave `endpoint_url` unset) or any
//! S3-compatible server such as MinIO (set `endpoint_url`, keep
//! `force_path_style` on).

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Configuration for the S3 backend.
///
/// Credentials are explicit rather than resolved from an ambient provider
/// chain: POST policy signing needs the raw secret key, which provider
/// chains do not expose uniformly.
///
/// # Examples
///
/// ```
/// use stowage_s3::S3StoreConfig;
///
/// let config = S3StoreConfig::builder()
///     .endpoint_url(Some("http://localhost:9000".to_owned()))
///     .access_key_id("minioadmin".to_owned())
///     .secret_access_key("minioadmin".to_owned())
///     .build();
/// assert_eq!(config.region, "us-east-1");
/// assert!(config.force_path_style);
/// ```
#[derive(Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct S3StoreConfig {
    /// Endpoint override (e.g. `"http://localhost:9000"`). `None` targets AWS.
    #[builder(default)]
    pub endpoint_url: Option<String>,

    /// AWS region.
    #[builder(default = String::from("us-east-1"))]
    pub region: String,

    /// Access key ID used for both SDK calls and policy signing.
    pub access_key_id: String,

    /// Secret access key used for both SDK calls and policy signing.
    pub secret_access_key: String,

    /// Whether to use path-style addressing (`endpoint/bucket/key`).
    /// Required by most non-AWS endpoints.
    #[builder(default = true)]
    pub force_path_style: bool,
}

impl std::fmt::Debug for S3StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3StoreConfig")
            .field("endpoint_url", &self.endpoint_url)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("force_path_style", &self.force_path_style)
            .finish()
    }
}

impl Default for S3StoreConfig {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            region: String::from("us-east-1"),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            force_path_style: true,
        }
    }
}

impl S3StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables (falling back to defaults):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `AWS_ENDPOINT_URL` | unset |
    /// | `AWS_REGION` | `us-east-1` |
    /// | `AWS_ACCESS_KEY_ID` | empty |
    /// | `AWS_SECRET_ACCESS_KEY` | empty |
    /// | `STOWAGE_FORCE_PATH_STYLE` | `true` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("AWS_ENDPOINT_URL") {
            config.endpoint_url = Some(v);
        }
        if let Ok(v) = std::env::var("AWS_REGION") {
            config.region = v;
        }
        if let Ok(v) = std::env::var("AWS_ACCESS_KEY_ID") {
            config.access_key_id = v;
        }
        if let Ok(v) = std::env::var("AWS_SECRET_ACCESS_KEY") {
            config.secret_access_key = v;
        }
        if let Ok(v) = std::env::var("STOWAGE_FORCE_PATH_STYLE") {
            config.force_path_style = parse_bool(&v);
        }

        config
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
