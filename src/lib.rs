//! # Bloom filter variants
//!
//! Space-efficient approximate set membership, in three flavours sharing one
//! hashing scheme and one binary format.
//!
//! ## Core idea
//! An element is hashed `k` times (with salts `0..k`) into `k` slots of an
//! `m`-slot array. Insert marks the slots, query checks them. Queries can be
//! wrong in one direction (false positives) and in exchange the structure
//! costs a few bits per element.
//!
//! - [`OrdinaryBloomFilter`]: bits; insert + query, never a false negative.
//! - [`CountingBloomFilter`]: byte counters; adds delete.
//! - [`PairedBloomFilter`]: positive and negative bit planes; adds delete
//!   for one bit per slot per plane, but can false-negate.
//!
//! Filters are single-owner values: mutate through `&mut`, share with
//! external locking if needed.

pub mod bits;
pub mod bloom;
pub mod codec;
pub mod error;
pub mod hash;
pub mod types;

// Public re-exports for the top-level API
pub use bloom::{
    BloomFilter, CountingBloomFilter, DeletableBloomFilter, FilterBuilder, OrdinaryBloomFilter,
    PairedBloomFilter,
};
pub use error::{Error, Result};
pub use hash::{Fnv1, FnvHash32, SaltedHasher, Xxh3};
pub use types::FilterParams;
