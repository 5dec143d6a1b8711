//! Object key generation.

use uuid::Uuid;

/// Source of fresh object keys.
///
/// The facade never derives keys from caller input; every stored object gets
/// a generated key (optionally nested under a caller-supplied scope). Swap
/// the generator to make key assignment deterministic in tests.
pub trait KeyGenerator: std::fmt::Debug + Send + Sync {
    /// Produce a new key, unique for all practical purposes.
    fn generate_key(&self) -> String;
}

/// Default [`KeyGenerator`] backed by UUID v4.
///
/// Keys are rendered without hyphens, e.g.
/// `67e5504410b1426f9247bb680e5fe0c8`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidKeyGenerator;

impl KeyGenerator for UuidKeyGenerator {
    fn generate_key(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Test generator that always returns the same key.
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct FixedKeyGenerator(pub(crate) &'static str);

#[cfg(test)]
impl KeyGenerator for FixedKeyGenerator {
    fn generate_key(&self) -> String {
        self.0.to_owned()
    }
}
