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

/// Bloom filter with an 8-bit counter per slot instead of a bit.
///
/// Insert increments the `k` counters, delete decrements them. Counters
/// wrap silently at 255 → 0 and 0 → 255: after 256 collisions on one slot
/// the filter can false-negate. This is a precision limit of the format,
/// not an error.
pub struct CountingBloomFilter<T: ?Sized, H = Fnv1> {
    core: FilterCore<H>,
    counters: Vec<u8>,
    _marker: PhantomData<fn(&T)>,
}

impl<T: ?Sized> CountingBloomFilter<T, Fnv1> {
    /// Create an empty filter hashing with salted FNV-1.
    pub fn new(num_hashes: u8, num_bits: u16) -> Result<Self> {
        Ok(Self::with_hasher(FilterParams::new(num_hashes, num_bits)?, Fnv1))
    }
}

impl<T: ?Sized, H> CountingBloomFilter<T, H> {
    /// Create an empty filter with a custom hasher.
    pub fn with_hasher(params: FilterParams, hasher: H) -> Self {
        Self {
            counters: vec![0u8; params.counter_len()],
            core: FilterCore::new(params, hasher),
            _marker: PhantomData,
        }
    }

    pub fn hasher(&self) -> &H {
        self.core.hasher()
    }

    /// Counter at slot `index`.
    ///
    /// # Panics
    /// Panics if `index >= num_bits`.
    pub fn counter(&self, index: usize) -> u8 {
        self.counters[index]
    }

    /// All counters, `num_bits` long.
    pub fn counters(&self) -> &[u8] {
        &self.counters
    }

    pub fn clear(&mut self) {
        self.counters.fill(0);
    }

    pub fn is_empty(&self) -> bool {
        self.counters.iter().all(|&c| c == 0)
    }

    /// Ordinary filter with a bit set wherever a counter is non-zero.
    pub fn to_ordinary(&self) -> OrdinaryBloomFilter<T, H>
    where
        H: Clone,
    {
        let mut bits = BitArray::new(self.counters.len());
        for (i, _) in self.counters.iter().enumerate().filter(|(_, c)| **c != 0) {
            bits.set(i);
        }
        debug!("converted counting filter ({}) to ordinary", self.core.params());
        OrdinaryBloomFilter::from_parts(self.core.clone(), bits)
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
        let counters = codec::read_payload(reader, params.counter_len())?;
        debug!("decoded counting filter ({params})");
        Ok(Self {
            core: FilterCore::new(params, hasher),
            counters,
            _marker: PhantomData,
        })
    }
}

impl<T: ?Sized, H: SaltedHasher<T>> BloomFilter<T> for CountingBloomFilter<T, H> {
    fn params(&self) -> FilterParams {
        self.core.params()
    }

    fn compute_index(&self, item: &T, salt: u8) -> usize {
        self.core.index(item, salt)
    }

    fn insert(&mut self, item: &T) {
        for pos in self.core.indices(item) {
            self.counters[pos] = self.counters[pos].wrapping_add(1);
        }
    }

    fn query(&self, item: &T) -> bool {
        self.core.indices(item).all(|pos| self.counters[pos] != 0)
    }

    fn encode(&self) -> Vec<u8> {
        let params = self.core.params();
        let mut buf = Vec::with_capacity(codec::HEADER_SIZE + params.counter_len());
        codec::encode_header(&params, &mut buf);
        buf.extend_from_slice(&self.counters);
        buf
    }
}

impl<T: ?Sized, H: SaltedHasher<T>> DeletableBloomFilter<T> for CountingBloomFilter<T, H> {
    fn delete(&mut self, item: &T) -> bool {
        if !self.query(item) {
            trace!("delete miss on counting filter");
            return false;
        }
        for pos in self.core.indices(item) {
            self.counters[pos] = self.counters[pos].wrapping_sub(1);
        }
        true
    }
}

impl<T: ?Sized, H: Clone> Clone for CountingBloomFilter<T, H> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
            counters: self.counters.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized, H: PartialEq> PartialEq for CountingBloomFilter<T, H> {
    fn eq(&self, other: &Self) -> bool {
        self.core == other.core && self.counters == other.counters
    }
}

impl<T: ?Sized, H: fmt::Debug> fmt::Debug for CountingBloomFilter<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountingBloomFilter")
            .field("params", &self.core.params())
            .field("hasher", self.core.hasher())
            .field("nonzero", &self.counters.iter().filter(|&&c| c != 0).count())
            .finish()
    }
}
