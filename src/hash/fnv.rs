use super::SaltedHasher;

/// 32-bit FNV-1: multiply by the prime, then XOR in the byte.
///
/// Must stay bit-for-bit stable: filters serialized with the [`Fnv1`]
/// hasher are only readable if the indices come out the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FnvHash32 {
    hash: u32,
}

impl FnvHash32 {
    pub const OFFSET: u32 = 2166136261;
    pub const PRIME: u32 = 16777619;

    pub fn new() -> Self {
        Self { hash: Self::OFFSET }
    }

    /// Consume more input. Can be called repeatedly to hash in chunks.
    pub fn update(&mut self, buf: &[u8]) {
        for &byte in buf {
            self.hash = self.hash.wrapping_mul(Self::PRIME);
            self.hash ^= byte as u32;
        }
    }

    pub fn digest(&self) -> u32 {
        self.hash
    }
}

impl Default for FnvHash32 {
    fn default() -> Self {
        Self::new()
    }
}

/// Salted FNV-1 over the element's bytes: the salt byte is hashed first,
/// then the element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fnv1;

impl<T: AsRef<[u8]> + ?Sized> SaltedHasher<T> for Fnv1 {
    fn hash_salted(&self, item: &T, salt: u8) -> u64 {
        let mut h = FnvHash32::new();
        h.update(&[salt]);
        h.update(item.as_ref());
        h.digest() as u64
    }
}
