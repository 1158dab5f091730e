//! The filter family.
//!
//! Every variant maps an element to `num_hashes` indices in `[0, num_bits)`
//! by hashing it once per salt `0..num_hashes` and reducing modulo
//! `num_bits`. The modulo introduces a slight bias when `num_bits` is not a
//! power of two.
//!
//! - [`OrdinaryBloomFilter`]: one bit per slot. No false negatives.
//! - [`CountingBloomFilter`]: one 8-bit counter per slot. Supports delete.
//! - [`PairedBloomFilter`]: a positive and a negative bit plane. Supports
//!   delete with one bit per slot per plane, but can false-negate.

pub mod builder;
mod counting;
mod ordinary;
mod paired;

pub use builder::FilterBuilder;
pub use counting::CountingBloomFilter;
pub use ordinary::OrdinaryBloomFilter;
pub use paired::PairedBloomFilter;

use std::io::Write;

use crate::error::{Error, Result};
use crate::hash::SaltedHasher;
use crate::types::FilterParams;

/// Capabilities shared by all variants.
pub trait BloomFilter<T: ?Sized> {
    /// Shape of this filter.
    fn params(&self) -> FilterParams;

    fn num_hashes(&self) -> u8 {
        self.params().num_hashes()
    }

    fn num_bits(&self) -> u16 {
        self.params().num_bits()
    }

    /// Index for one hash round of `item`, in `[0, num_bits)`.
    fn compute_index(&self, item: &T, salt: u8) -> usize;

    /// Add `item` to the set. Inserting twice is harmless.
    fn insert(&mut self, item: &T);

    /// Check if `item` MIGHT be in the set.
    fn query(&self, item: &T) -> bool;

    /// Serialize header and payload to bytes.
    fn encode(&self) -> Vec<u8>;

    /// Serialize into a stream.
    fn write_to(&self, out: &mut dyn Write) -> Result<()> {
        out.write_all(&self.encode())?;
        Ok(())
    }
}

/// Variants that can remove elements.
pub trait DeletableBloomFilter<T: ?Sized>: BloomFilter<T> {
    /// Remove `item` if it queries present. Returns whether anything changed.
    ///
    /// A false positive query means a non-member can be "deleted", which
    /// damages the state of the members it collides with.
    fn delete(&mut self, item: &T) -> bool;
}

/// Parameters plus hasher: the part every variant shares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FilterCore<H> {
    params: FilterParams,
    hasher: H,
}

impl<H> FilterCore<H> {
    pub(crate) fn new(params: FilterParams, hasher: H) -> Self {
        Self { params, hasher }
    }

    pub(crate) fn params(&self) -> FilterParams {
        self.params
    }

    pub(crate) fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Logical width as an index bound.
    pub(crate) fn width(&self) -> usize {
        self.params.num_bits() as usize
    }

    pub(crate) fn index<T: ?Sized>(&self, item: &T, salt: u8) -> usize
    where
        H: SaltedHasher<T>,
    {
        // FilterParams guarantees num_bits > 0.
        (self.hasher.hash_salted(item, salt) % self.params.num_bits() as u64) as usize
    }

    /// One index per salt in `0..num_hashes`.
    pub(crate) fn indices<'a, T: ?Sized>(&'a self, item: &'a T) -> impl Iterator<Item = usize> + 'a
    where
        H: SaltedHasher<T>,
    {
        (0..self.params.num_hashes()).map(move |salt| self.index(item, salt))
    }

    /// Fail unless `other` has exactly this shape.
    pub(crate) fn check_shape(&self, other: FilterParams) -> Result<()> {
        if self.params != other {
            return Err(Error::ShapeMismatch {
                expected: self.params.to_string(),
                found: other.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Fnv1;

    #[test]
    fn indices_stay_in_range() {
        let core = FilterCore::new(FilterParams::new(16, 37).unwrap(), Fnv1);
        for key in ["a", "b", "Hello world!", ""] {
            let idx: Vec<usize> = core.indices(key).collect();
            assert_eq!(idx.len(), 16);
            assert!(idx.iter().all(|&i| i < 37));
        }
    }

    #[test]
    fn index_is_reduced_hash() {
        let core = FilterCore::new(FilterParams::new(4, 32).unwrap(), Fnv1);
        let raw = Fnv1.hash_salted("key", 2);
        assert_eq!(core.index("key", 2), (raw % 32) as usize);
    }

    #[test]
    fn zero_hashes_yield_no_indices() {
        let core = FilterCore::new(FilterParams::new(0, 8).unwrap(), Fnv1);
        assert_eq!(core.indices("key").count(), 0);
    }

    #[test]
    fn shape_check() {
        let core = FilterCore::new(FilterParams::new(4, 32).unwrap(), Fnv1);
        assert!(core.check_shape(FilterParams::new(4, 32).unwrap()).is_ok());
        assert!(matches!(
            core.check_shape(FilterParams::new(4, 64).unwrap()),
            Err(Error::ShapeMismatch { .. })
        ));
    }
}
