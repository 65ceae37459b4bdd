//! # rxchain-ledger — Prescription Hash Chain
//!
//! An append-only, singly-linked chain of blocks. Each block stores an
//! opaque [`Record`](rxchain_core::Record), the instant it was appended, the
//! digest of its predecessor, and its own SHA-256 digest over those three
//! fields.
//!
//! - **Block** (`block.rs`): sealing, digest recomputation, console view.
//! - **Chain** (`chain.rs`): append, integrity verification, dump.
//!
//! ## Security Invariant
//!
//! Digests are computed exclusively through `CanonicalBytes` →
//! `sha256_digest()`, the same path at append time and at verification
//! time. Mutating any field of any block makes [`Chain::validate`] return
//! false.
//!
//! This crate knows nothing about classification; screening happens in the
//! caller before `append`.

pub mod block;
pub mod chain;

pub use block::{block_digest, Block, BlockView, PreviousDigest, GENESIS_SENTINEL};
pub use chain::{Chain, IntegrityError, IntegrityErrorKind};
