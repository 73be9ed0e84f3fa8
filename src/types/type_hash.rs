//! Deterministic hash-based identity for natively declared types.
//!
//! Descriptors built on the host side have no engine-assigned type id until
//! they are matched against a live engine, so they carry a [`TypeHash`]
//! computed from the qualified type name instead. Hashes are deterministic:
//! the same name always produces the same hash, regardless of registration
//! order or which engine instance is live.

use std::fmt;

use xxhash_rust::xxh64::xxh64;

/// Domain marker mixed into type-name hashes.
const TYPE_DOMAIN: u64 = 0x2fac10b63a6cc57c;

/// Separator constant mixed between namespace and name.
const SEP: u64 = 0x4bc94d6bd06053ad;

/// A 64-bit deterministic hash identifying a named type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeHash(u64);

impl TypeHash {
    pub const fn from_raw(value: u64) -> Self {
        TypeHash(value)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Hash of an unqualified type name.
    pub fn from_name(name: &str) -> Self {
        TypeHash(xxh64(name.as_bytes(), TYPE_DOMAIN))
    }

    /// Hash of a namespace-qualified type name.
    ///
    /// An empty namespace hashes identically to [`TypeHash::from_name`].
    pub fn from_qualified(namespace: &str, name: &str) -> Self {
        if namespace.is_empty() {
            return Self::from_name(name);
        }
        let seed = xxh64(namespace.as_bytes(), TYPE_DOMAIN) ^ SEP;
        TypeHash(xxh64(name.as_bytes(), seed))
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
