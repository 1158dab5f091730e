use std::fmt;
use std::io::Read;
use std::marker::PhantomData;

use log::debug;

use super::{BloomFilter, FilterCore, PairedBloomFilter};
use crate::bits::BitArray;
use crate::codec;
use crate::error::{Error, Result};
use crate::hash::{Fnv1, SaltedHasher};
use crate::types::FilterParams;

/// Probabilistic data structure: "is this element in the set?"
///
/// - If any bit is 0 → element is DEFINITELY NOT in the set
/// - If all bits are 1 → element is PROBABLY in the set (false positive possible)
///
/// Insert-only. With `k` hashes, `n` insertions and `m` bits the false
/// positive rate approaches `(1 - e^{-kn/m})^k`.
pub struct OrdinaryBloomFilter<T: ?Sized, H = Fnv1> {
    core: FilterCore<H>,
    bits: BitArray,
    _marker: PhantomData<fn(&T)>,
}

impl<T: ?Sized> OrdinaryBloomFilter<T, Fnv1> {
    /// Create an empty filter hashing with salted FNV-1.
    pub fn new(num_hashes: u8, num_bits: u16) -> Result<Self> {
        Ok(Self::with_hasher(FilterParams::new(num_hashes, num_bits)?, Fnv1))
    }
}

impl<T: ?Sized, H> OrdinaryBloomFilter<T, H> {
    /// Create an empty filter with a custom hasher.
    pub fn with_hasher(params: FilterParams, hasher: H) -> Self {
        let bits = BitArray::new(params.num_bits() as usize);
        Self::from_parts(FilterCore::new(params, hasher), bits)
    }

    pub(crate) fn from_parts(core: FilterCore<H>, bits: BitArray) -> Self {
        debug_assert_eq!(bits.len(), core.width());
        Self {
            core,
            bits,
            _marker: PhantomData,
        }
    }

    pub fn hasher(&self) -> &H {
        self.core.hasher()
    }

    /// The raw bit array, `num_bits` long.
    pub fn bit_array(&self) -> &BitArray {
        &self.bits
    }

    /// Forget every element.
    pub fn clear(&mut self) {
        self.bits.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.bits.count_ones() == 0
    }

    /// Number of bits set to 1.
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    /// Fraction of bits set to 1.
    pub fn fill_ratio(&self) -> f64 {
        self.count_ones() as f64 / self.core.width() as f64
    }

    /// Current false positive rate estimated from the fill ratio: `fill^k`.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        self.fill_ratio().powi(self.core.params().num_hashes() as i32)
    }

    /// Fold the filter into half its width.
    ///
    /// Bit `i` of this filter is OR-ed into bit `i mod (m / 2)` of the
    /// result. Members stay members; the false positive rate goes up.
    /// Requires an even width of at least 2, since only then does
    /// `(h mod m) mod (m / 2)` equal `h mod (m / 2)`.
    pub fn compress(&self) -> Result<Self>
    where
        H: Clone,
    {
        let params = self.core.params();
        let num_bits = params.num_bits();
        if num_bits < 2 || num_bits % 2 != 0 {
            return Err(Error::InvalidParameter(format!(
                "cannot compress a filter of {num_bits} bits: width must be even and >= 2"
            )));
        }

        let half = FilterParams::new(params.num_hashes(), num_bits / 2)?;
        let mut bits = BitArray::new(half.num_bits() as usize);
        let width = bits.len();
        for i in self.bits.iter_ones() {
            bits.set(i % width);
        }

        debug!("compressed ordinary filter from {params} to {half}");
        Ok(Self::from_parts(
            FilterCore::new(half, self.core.hasher().clone()),
            bits,
        ))
    }

    /// Paired filter whose positive plane is this bit array and whose
    /// negative plane is empty.
    pub fn to_paired(&self) -> PairedBloomFilter<T, H>
    where
        H: Clone,
    {
        let width = self.core.width();
        let mut planes = BitArray::new(2 * width);
        for i in self.bits.iter_ones() {
            planes.set(i);
        }
        debug!("converted ordinary filter ({}) to paired", self.core.params());
        PairedBloomFilter::from_parts(self.core.clone(), planes)
    }

    /// Add every element of `other` to this filter (bitwise OR).
    pub fn union(&mut self, other: &Self) -> Result<()> {
        self.core.check_shape(other.core.params())?;
        self.bits.union_with(&other.bits);
        debug!("merged ordinary filters ({})", self.core.params());
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
        let payload = codec::read_payload(reader, params.packed_len())?;
        debug!("decoded ordinary filter ({params})");
        let bits = BitArray::from_packed(payload, params.num_bits() as usize);
        Ok(Self::from_parts(FilterCore::new(params, hasher), bits))
    }
}

impl<T: ?Sized, H: SaltedHasher<T>> BloomFilter<T> for OrdinaryBloomFilter<T, H> {
    fn params(&self) -> FilterParams {
        self.core.params()
    }

    fn compute_index(&self, item: &T, salt: u8) -> usize {
        self.core.index(item, salt)
    }

    fn insert(&mut self, item: &T) {
        for pos in self.core.indices(item) {
            self.bits.set(pos);
        }
    }

    fn query(&self, item: &T) -> bool {
        self.core.indices(item).all(|pos| self.bits.get(pos))
    }

    fn encode(&self) -> Vec<u8> {
        let params = self.core.params();
        let mut buf = Vec::with_capacity(codec::HEADER_SIZE + params.packed_len());
        codec::encode_header(&params, &mut buf);
        buf.extend_from_slice(self.bits.as_packed());
        buf
    }
}

impl<T: ?Sized, H: Clone> Clone for OrdinaryBloomFilter<T, H> {
    fn clone(&self) -> Self {
        Self::from_parts(self.core.clone(), self.bits.clone())
    }
}

impl<T: ?Sized, H: PartialEq> PartialEq for OrdinaryBloomFilter<T, H> {
    fn eq(&self, other: &Self) -> bool {
        self.core == other.core && self.bits == other.bits
    }
}

impl<T: ?Sized, H: fmt::Debug> fmt::Debug for OrdinaryBloomFilter<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrdinaryBloomFilter")
            .field("params", &self.core.params())
            .field("hasher", self.core.hasher())
            .field("ones", &self.bits.count_ones())
            .finish()
    }
}
