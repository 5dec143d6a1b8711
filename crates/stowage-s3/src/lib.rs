//! S3 backend for the Stowage object store.
//!
//! This crate binds the [`stowage_store::ObjectStore`] trait to an
//! S3-compatible service via `aws-sdk-s3`. It targets MinIO and other
//! path-style deployments as readily as AWS itself: point it at an endpoint
//! URL with static credentials and every store operation, including presigned
//! GET URLs and browser POST upload policies, goes through that service.
//!
//! # Usage
//!
//! ```no_run
//! use stowage_s3::{S3Store, S3StoreConfig};
//!
//! let config = S3StoreConfig::builder()
//!     .endpoint_url(Some("http://localhost:9000".to_owned()))
//!     .access_key_id("minioadmin".to_owned())
//!     .secret_access_key("minioadmin".to_owned())
//!     .build();
//! let store = S3Store::connect(config);
//! ```
//!
//! # Modules
//!
//! - [`config`] - Connection settings and environment loading
//! - [`store`] - The [`S3Store`] backend itself

pub mod config;
mod post_policy;
pub mod store;

pub use config::S3StoreConfig;
pub use store::S3Store;
