//! Object-storage facade for Stowage.
//!
//! This crate gives callers a compact `s3:bucket:objectKey` addressing
//! scheme over any [`stowage_store::ObjectStore`] backend, with lazy bucket
//! provisioning, short-lived upload and download credentials, direct
//! reads/writes, and best-effort batch deletion. The backend is the sole
//! source of truth; the facade holds no object state of its own.
//!
//! # Architecture
//!
//! ```text
//! HTTP / multipart layer (external)
//!        |
//!        v
//!    Stowage (facade: addressing, provisioning, credentials)
//!        |
//!        v
//!   ObjectStore trait (stowage-store)
//!    /        \
//!   v          v
//! MemoryStore  S3Store (stowage-s3)
//! ```

pub mod address;
pub mod config;
pub mod error;
pub mod keygen;
pub mod metadata;
mod ops;
pub mod provider;

pub use address::{ADDRESS_SCHEME, ObjectAddress};
pub use config::StowageConfig;
pub use error::{StowageError, StowageResult};
pub use keygen::{KeyGenerator, UuidKeyGenerator};
pub use metadata::ResolvedMetadata;
pub use ops::delete::DeleteOutcome;
pub use ops::download::{DEFAULT_DOWNLOAD_TTL, DownloadGrant, FetchedObject, MIN_DOWNLOAD_TTL};
pub use ops::upload::{DEFAULT_UPLOAD_TTL, IssuedUpload, WriteRequest};
pub use provider::Stowage;
