use std::fmt;
use std::io::Read;
use std::marker::PhantomData;

use log::{debug, trace};

use super::{BloomFilter, DeletableBloomFilter, FilterCore, OrdinaryBloomFilter};
use crate::bits::BitArray;
use crate::codec;
use crate::error::Result;
use crate::hash::{Fnv1, SaltedHasher};
use crate::types::FilterParams;

/// Two bit planes: insert marks the positive plane, delete marks the
/// negative plane.
///
/// An element is present if all its positive bits are set and not all of
/// its negative bits are set. Collisions in the positive plane give false
/// positives, collisions with unrelated deletions in the negative plane give
/// false negatives.
///
/// Deletion is sticky: inserting an element again does not clear the
/// negative bits its deletion set, so it may keep querying absent.
///
/// Storage is a single array of `2 * num_bits` bits, positive plane first,
/// which is also the serialized payload order.
pub struct PairedBloomFilter<T: ?Sized, H = Fnv1> {
    core: FilterCore<H>,
    planes: BitArray,
    _marker: PhantomData<fn(&T)>,
}

impl<T: ?Sized> PairedBloomFilter<T, Fnv1> {
    /// Create an empty filter hashing with salted FNV-1.
    pub fn new(num_hashes: u8, num_bits: u16) -> Result<Self> {
        Ok(Self::with_hasher(FilterParams::new(num_hashes, num_bits)?, Fnv1))
    }
}

impl<T: ?Sized, H> PairedBloomFilter<T, H> {
    /// Create an empty filter with a custom hasher.
    pub fn with_hasher(params: FilterParams, hasher: H) -> Self {
        let planes = BitArray::new(2 * params.num_bits() as usize);
        Self::from_parts(FilterCore::new(params, hasher), planes)
    }

    pub(crate) fn from_parts(core: FilterCore<H>, planes: BitArray) -> Self {
        debug_assert_eq!(planes.len(), 2 * core.width());
        Self {
            core,
            planes,
            _marker: PhantomData,
        }
    }

    pub fn hasher(&self) -> &H {
        self.core.hasher()
    }

    /// Both planes, positive then negative, `2 * num_bits` long.
    pub fn planes(&self) -> &BitArray {
        &self.planes
    }

    pub fn positive(&self, index: usize) -> bool {
        self.planes.get(index)
    }

    pub fn negative(&self, index: usize) -> bool {
        self.planes.get(self.core.width() + index)
    }

    pub fn clear(&mut self) {
        self.planes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.positive_count() == 0
    }

    /// Set bits in the positive plane.
    pub fn positive_count(&self) -> usize {
        self.planes.count_ones_in(0, self.core.width())
    }

    /// Set bits in the negative plane.
    pub fn negative_count(&self) -> usize {
        let width = self.core.width();
        self.planes.count_ones_in(width, 2 * width)
    }

    /// Fraction of positive bits set.
    pub fn fill_ratio(&self) -> f64 {
        self.positive_count() as f64 / self.core.width() as f64
    }

    /// False positive rate of the positive plane alone: `fill^k`.
    /// Recorded deletions only lower the real rate.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        self.fill_ratio().powi(self.core.params().num_hashes() as i32)
    }

    /// Ordinary filter over the positive plane. Deletions are dropped, so
    /// deleted elements may come back as positives.
    pub fn to_ordinary(&self) -> OrdinaryBloomFilter<T, H>
    where
        H: Clone,
    {
        let width = self.core.width();
        let mut bits = BitArray::new(width);
        for i in self.planes.iter_ones().take_while(|&i| i < width) {
            bits.set(i);
        }
        debug!("converted paired filter ({}) to ordinary", self.core.params());
        OrdinaryBloomFilter::from_parts(self.core.clone(), bits)
    }

    /// Merge `other` into this filter.
    ///
    /// Positive planes are OR-ed, negative planes AND-ed: a slot counts as
    /// deleted only if both sides deleted it. This can miss deletions seen by
    /// one side, but adds no new false negatives.
    pub fn union(&mut self, other: &Self) -> Result<()> {
        self.core.check_shape(other.core.params())?;
        let width = self.core.width();
        for i in 0..width {
            if other.planes.get(i) {
                self.planes.set(i);
            }
        }
        for i in width..2 * width {
            let both = self.planes.get(i) && other.planes.get(i);
            self.planes.assign(i, both);
        }
        debug!("merged paired filters ({})", self.core.params());
        Ok(())
    }

    /// Deserialize from bytes, ignoring anything past the payload.
    pub fn decode(data: &[u8]) -> Result<Self>
    where
        H: Default,
    {
        Self::decode_with_hasher(data, H::default())
    }

    pub fn decode_with_hasher(mut data: &[u8], hasher: H) -> Result<Self> {
        Self::read_from_with_hasher(&mut data, hasher)
    }

    /// Deserialize from a stream, consuming exactly header + payload.
    pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<Self>
    where
        H: Default,
    {
        Self::read_from_with_hasher(reader, H::default())
    }

    pub fn read_from_with_hasher<R: Read + ?Sized>(reader: &mut R, hasher: H) -> Result<Self> {
        let params = codec::read_header(reader)?;
        let payload = codec::read_payload(reader, params.paired_packed_len())?;
        debug!("decoded paired filter ({params})");
        let planes = BitArray::from_packed(payload, 2 * params.num_bits() as usize);
        Ok(Self::from_parts(FilterCore::new(params, hasher), planes))
    }
}

impl<T: ?Sized, H: SaltedHasher<T>> BloomFilter<T> for PairedBloomFilter<T, H> {
    fn params(&self) -> FilterParams {
        self.core.params()
    }

    fn compute_index(&self, item: &T, salt: u8) -> usize {
        self.core.index(item, salt)
    }

    fn insert(&mut self, item: &T) {
        for pos in self.core.indices(item) {
            self.planes.set(pos);
        }
    }

    fn query(&self, item: &T) -> bool {
        if !self.core.indices(item).all(|pos| self.positive(pos)) {
            return false;
        }
        // Present unless every negative bit is set.
        !self.core.indices(item).all(|pos| self.negative(pos))
    }

    fn encode(&self) -> Vec<u8> {
        let params = self.core.params();
        let mut buf = Vec::with_capacity(codec::HEADER_SIZE + params.paired_packed_len());
        codec::encode_header(&params, &mut buf);
        buf.extend_from_slice(self.planes.as_packed());
        buf
    }
}

impl<T: ?Sized, H: SaltedHasher<T>> DeletableBloomFilter<T> for PairedBloomFilter<T, H> {
    fn delete(&mut self, item: &T) -> bool {
        if !self.query(item) {
            trace!("delete miss on paired filter");
            return false;
        }
        let width = self.core.width();
        for pos in self.core.indices(item) {
            self.planes.set(width + pos);
        }
        true
    }
}

impl<T: ?Sized, H: Clone> Clone for PairedBloomFilter<T, H> {
    fn clone(&self) -> Self {
        Self::from_parts(self.core.clone(), self.planes.clone())
    }
}

impl<T: ?Sized, H: PartialEq> PartialEq for PairedBloomFilter<T, H> {
    fn eq(&self, other: &Self) -> bool {
        self.core == other.core && self.planes == other.planes
    }
}

impl<T: ?Sized, H: fmt::Debug> fmt::Debug for PairedBloomFilter<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairedBloomFilter")
            .field("params", &self.core.params())
            .field("hasher", self.core.hasher())
            .field("positive", &self.positive_count())
            .field("negative", &self.negative_count())
            .finish()
    }
}
