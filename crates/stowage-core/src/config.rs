//! Facade configuration.
//!
//! Provides [`StowageConfig`] for tuning upload limits and bucket defaults.
//! Values can be loaded from environment variables via
//! [`StowageConfig::from_env`].

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Configuration for the Stowage facade.
///
/// All fields have defaults, so `StowageConfig::default()` is a working
/// configuration.
///
/// # Examples
///
/// ```
/// use stowage_core::StowageConfig;
///
/// let config = StowageConfig::default();
/// assert_eq!(config.max_size_mb, 100);
/// assert_eq!(config.max_size_bytes(), 104_857_600);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct StowageConfig {
    /// Maximum accepted upload size, in megabytes.
    #[builder(default = 100)]
    pub max_size_mb: u64,

    /// Bucket used by deployments that do not pick one per call.
    #[builder(default = String::from("stowage"))]
    pub default_bucket: String,

    /// MIME types accepted for upload. Empty means any type is accepted.
    #[builder(default)]
    pub allowed_mime_types: Vec<String>,
}

impl Default for StowageConfig {
    fn default() -> Self {
        Self {
            max_size_mb: 100,
            default_bucket: String::from("stowage"),
            allowed_mime_types: Vec::new(),
        }
    }
}

impl StowageConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables (falling back to defaults):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `STOWAGE_MAX_SIZE_MB` | `100` |
    /// | `STOWAGE_DEFAULT_BUCKET` | `stowage` |
    /// | `STOWAGE_ALLOWED_MIME_TYPES` | empty (comma-separated list) |
    ///
    /// # Examples
    ///
    /// ```
    /// use stowage_core::StowageConfig;
    ///
    /// let config = StowageConfig::from_env();
    /// assert!(config.max_size_mb > 0);
    /// ```
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("STOWAGE_MAX_SIZE_MB") {
            if let Ok(n) = v.parse::<u64>() {
                config.max_size_mb = n;
            }
        }
        if let Ok(v) = std::env::var("STOWAGE_DEFAULT_BUCKET") {
            config.default_bucket = v;
        }
        if let Ok(v) = std::env::var("STOWAGE_ALLOWED_MIME_TYPES") {
            config.allowed_mime_types = v
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(ToOwned::to_owned)
                .collect();
        }

        config
    }

    /// The upload size limit in bytes.
    #[must_use]
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb.saturating_mul(1024 * 1024)
    }

    /// Whether `content_type` passes the configured MIME allow-list.
    ///
    /// An empty list accepts everything.
    #[must_use]
    pub fn is_mime_allowed(&self, content_type: &str) -> bool {
        self.allowed_mime_types.is_empty()
            || self
                .allowed_mime_types
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(content_type))
    }
}
