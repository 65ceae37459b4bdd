//! # rxchain-core — Foundational Types
//!
//! The leaf of the rxchain crate graph. Defines the primitives every other
//! crate builds on:
//!
//! - **`Record`** (`record.rs`): the opaque, float-free payload stored in a
//!   block, with a prescription constructor for the screening driver.
//! - **`CanonicalBytes`** (`canonical.rs`): RFC 8785 canonical encoding via
//!   `serde_jcs`.
//!   ALL digest computation flows through it.
//! - **`ContentDigest`** (`digest.rs`): SHA-256 fingerprints, computable only
//!   from `CanonicalBytes`.
//! - **`Timestamp`** (`temporal.rs`): UTC-only, microsecond-precision stamps
//!   with a single string form.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `rxchain-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod record;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest};
pub use error::{CanonicalizationError, RxChainError};
pub use record::{FieldValue, Record, Status};
pub use temporal::Timestamp;
