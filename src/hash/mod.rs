//! Salted hashing: the one capability every filter needs from its element type.
//!
//! A filter derives its `k` indices for an element by hashing it `k` times
//! with salts `0..k`. This is a salted single-hash scheme, not a family of
//! independent hash functions, so the rounds are only approximately
//! independent.

mod fnv;
mod xxh3;

pub use fnv::{Fnv1, FnvHash32};
pub use xxh3::Xxh3;

/// Deterministic hash of (element, one-byte salt).
///
/// Implement this for custom element types or hash functions; the filters
/// only ever see the returned integer, reduced modulo their width.
pub trait SaltedHasher<T: ?Sized> {
    fn hash_salted(&self, item: &T, salt: u8) -> u64;
}

impl<T: ?Sized, H: SaltedHasher<T> + ?Sized> SaltedHasher<T> for &H {
    fn hash_salted(&self, item: &T, salt: u8) -> u64 {
        (**self).hash_salted(item, salt)
    }
}
