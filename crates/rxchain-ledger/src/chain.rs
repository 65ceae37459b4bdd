//! # Chain
//!
//! Append-only sequence of sealed blocks.
//!
//! ## Integrity Invariants
//!
//! - Every block's stored digest equals the digest recomputed from its
//!   payload, `created_at`, and `previous_digest`.
//! - Block 0 links to [`GENESIS_SENTINEL`](crate::GENESIS_SENTINEL).
//! - Block i > 0 links to the stored digest of block i - 1.
//!
//! [`Chain::verify`] checks all three, including the self-consistency of
//! block 0, and reports the first failing block.

use rxchain_core::{ContentDigest, Record, Timestamp};
use thiserror::Error;

use crate::block::{Block, BlockView, PreviousDigest};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// The first integrity violation found in a chain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("integrity violation at block {index}: {kind}")]
pub struct IntegrityError {
    /// Zero-based index of the offending block.
    pub index: usize,
    /// What was wrong with it.
    pub kind: IntegrityErrorKind,
}

/// Classes of integrity violation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityErrorKind {
    /// The stored digest does not match the block's contents.
    #[error("stored digest {actual} does not match recomputed digest {expected}")]
    DigestMismatch {
        /// Digest recomputed from the block's fields.
        expected: ContentDigest,
        /// Digest stored on the block.
        actual: ContentDigest,
    },

    /// `previous_digest` does not match the preceding block's digest.
    #[error("previous digest {actual} does not match preceding block digest {expected}")]
    BrokenLink {
        /// Stored digest of the preceding block.
        expected: ContentDigest,
        /// What the block links to instead.
        actual: PreviousDigest,
    },

    /// Block 0 does not carry the genesis sentinel.
    #[error("first block must link to the genesis sentinel, found {actual}")]
    GenesisLinkInvalid {
        /// What block 0 links to instead.
        actual: PreviousDigest,
    },
}

// ---------------------------------------------------------------------------
// Chain
// ---------------------------------------------------------------------------

/// An in-memory, append-only hash chain.
///
/// Not designed for concurrent mutation; wrap in a lock if shared.
#[derive(Debug, Default)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns true if no block has been appended.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The most recently appended block.
    pub fn last(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// The block at `index`.
    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// What the next appended block will link to.
    pub fn head_digest(&self) -> PreviousDigest {
        match self.blocks.last() {
            Some(block) => PreviousDigest::Block(block.digest),
            None => PreviousDigest::Genesis,
        }
    }

    /// Append a payload stamped with the current wall-clock time.
    pub fn append(&mut self, payload: Record) -> &Block {
        self.append_at(payload, Timestamp::now())
    }

    /// Append a payload with an explicit `created_at`.
    pub fn append_at(&mut self, payload: Record, created_at: Timestamp) -> &Block {
        let block = Block::seal(payload, created_at, self.head_digest());
        tracing::debug!(
            index = self.blocks.len(),
            digest = %block.digest,
            previous_digest = %block.previous_digest,
            "appended block"
        );
        let index = self.blocks.len();
        self.blocks.push(block);
        &self.blocks[index]
    }

    /// Check every block and link, reporting the first violation.
    pub fn verify(&self) -> Result<(), IntegrityError> {
        for (index, block) in self.blocks.iter().enumerate() {
            let recomputed = block.recompute_digest();
            if recomputed != block.digest {
                return Err(report(IntegrityError {
                    index,
                    kind: IntegrityErrorKind::DigestMismatch {
                        expected: recomputed,
                        actual: block.digest,
                    },
                }));
            }

            match index.checked_sub(1).map(|prev| &self.blocks[prev]) {
                None if !block.previous_digest.is_genesis() => {
                    return Err(report(IntegrityError {
                        index,
                        kind: IntegrityErrorKind::GenesisLinkInvalid {
                            actual: block.previous_digest,
                        },
                    }));
                }
                Some(prev) if block.previous_digest.digest() != Some(&prev.digest) => {
                    return Err(report(IntegrityError {
                        index,
                        kind: IntegrityErrorKind::BrokenLink {
                            expected: prev.digest,
                            actual: block.previous_digest,
                        },
                    }));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns true iff [`verify`](Self::verify) finds no violation.
    pub fn validate(&self) -> bool {
        self.verify().is_ok()
    }

    /// Read-only enumeration of blocks with their positions.
    pub fn dump(&self) -> impl Iterator<Item = BlockView<'_>> {
        self.blocks
            .iter()
            .enumerate()
            .map(|(index, block)| BlockView { index, block })
    }

    /// Iterate blocks in chain order.
    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }
}

fn report(err: IntegrityError) -> IntegrityError {
    tracing::warn!(index = err.index, error = %err.kind, "chain integrity check failed");
    err
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Display for Chain {
    /// One stanza per block, each followed by a blank line.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for view in self.dump() {
            writeln!(f, "{view}")?;
        }
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
