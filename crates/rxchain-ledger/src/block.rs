//! # Blocks
//!
//! A block binds a payload to the instant it was stored and to the digest
//! of its predecessor:
//!
//! ```text
//! digest = SHA256(JCS({"created_at": <iso>, "payload": <record>, "previous_digest": <"0" | hex>}))
//! ```
//!
//! The stored digest is never part of its own hash material. Blocks are
//! sealed once, inside [`Chain::append`](crate::Chain::append), and expose
//! their fields read-only.

use std::fmt;

use rxchain_core::{sha256_digest, CanonicalBytes, ContentDigest, Record, Timestamp};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The `previous_digest` of the first block in every chain.
pub const GENESIS_SENTINEL: &str = "0";

/// What a block links back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreviousDigest {
    /// No predecessor; renders as [`GENESIS_SENTINEL`].
    Genesis,
    /// The digest of the preceding block.
    Block(ContentDigest),
}

impl PreviousDigest {
    /// Returns true for the genesis sentinel.
    pub fn is_genesis(&self) -> bool {
        matches!(self, Self::Genesis)
    }

    /// The linked digest, if any.
    pub fn digest(&self) -> Option<&ContentDigest> {
        match self {
            Self::Genesis => None,
            Self::Block(d) => Some(d),
        }
    }

    /// The string that enters the hash material.
    pub fn to_canonical_string(&self) -> String {
        match self {
            Self::Genesis => GENESIS_SENTINEL.to_string(),
            Self::Block(d) => d.to_hex(),
        }
    }

    /// Parse `"0"` or a 64-char hex digest.
    pub fn parse(s: &str) -> Result<Self, rxchain_core::RxChainError> {
        if s == GENESIS_SENTINEL {
            Ok(Self::Genesis)
        } else {
            ContentDigest::from_hex(s).map(Self::Block)
        }
    }
}

impl From<ContentDigest> for PreviousDigest {
    fn from(d: ContentDigest) -> Self {
        Self::Block(d)
    }
}

impl fmt::Display for PreviousDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl Serialize for PreviousDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_canonical_string())
    }
}

impl<'de> Deserialize<'de> for PreviousDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A sealed block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub(crate) payload: Record,
    pub(crate) created_at: Timestamp,
    pub(crate) previous_digest: PreviousDigest,
    pub(crate) digest: ContentDigest,
}

impl Block {
    /// Hash the block's logical fields and freeze them together with the
    /// resulting digest.
    pub(crate) fn seal(
        payload: Record,
        created_at: Timestamp,
        previous_digest: PreviousDigest,
    ) -> Self {
        let digest = block_digest(&payload, &created_at, &previous_digest);
        Self {
            payload,
            created_at,
            previous_digest,
            digest,
        }
    }

    /// The caller-supplied record.
    pub fn payload(&self) -> &Record {
        &self.payload
    }

    /// When the block was appended.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Link to the preceding block.
    pub fn previous_digest(&self) -> &PreviousDigest {
        &self.previous_digest
    }

    /// The digest stored at sealing time.
    pub fn digest(&self) -> &ContentDigest {
        &self.digest
    }

    /// Recompute the digest from the block's current contents.
    pub fn recompute_digest(&self) -> ContentDigest {
        block_digest(&self.payload, &self.created_at, &self.previous_digest)
    }

    /// Returns true if the stored digest matches the contents.
    pub fn is_self_consistent(&self) -> bool {
        self.recompute_digest() == self.digest
    }
}

/// Compute the digest of a block's logical fields.
pub fn block_digest(
    payload: &Record,
    created_at: &Timestamp,
    previous_digest: &PreviousDigest,
) -> ContentDigest {
    sha256_digest(&hash_material(payload, created_at, previous_digest))
}

/// The three fields a block digest covers. The stored digest is not one of them.
#[derive(Serialize)]
struct HashMaterial<'a> {
    created_at: String,
    payload: &'a Record,
    previous_digest: &'a PreviousDigest,
}

fn hash_material(
    payload: &Record,
    created_at: &Timestamp,
    previous_digest: &PreviousDigest,
) -> CanonicalBytes {
    let material = HashMaterial {
        created_at: created_at.to_iso8601(),
        payload,
        previous_digest,
    };
    // Record is a float-free FieldValue tree with string keys and the other
    // two fields are strings, so JCS serialization cannot fail here.
    CanonicalBytes::new(&material).expect("block hash material is always canonicalizable")
}

/// A read-only view of a block and its position, as produced by
/// [`Chain::dump`](crate::Chain::dump).
#[derive(Debug, Clone, Copy)]
pub struct BlockView<'a> {
    /// Zero-based position in the chain.
    pub index: usize,
    /// The block itself.
    pub block: &'a Block,
}

impl BlockView<'_> {
    /// One-based block number, as shown in dumps.
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

impl fmt::Display for BlockView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Block {} ---", self.number())?;
        writeln!(f, "Hash: {}", self.block.digest)?;
        writeln!(f, "Previous Hash: {}", self.block.previous_digest)?;
        writeln!(f, "Data: {}", self.block.payload)?;
        writeln!(f, "Timestamp: {}", self.block.created_at)
    }
}
