//! Fixed-width bit array backed by bytes in serialized order.
//!
//! Bit `i` lives in byte `i / 8` under mask `0x80 >> (i % 8)`: the first bit
//! of every group of eight is the most significant bit of its byte. The
//! backing bytes are therefore exactly the packed payload of the binary
//! format, and unused trailing bits of the last byte are always zero.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitArray {
    bytes: Vec<u8>,
    len: usize,
}

impl BitArray {
    /// All-zero array of `len` bits.
    pub fn new(len: usize) -> Self {
        Self {
            bytes: vec![0u8; len.div_ceil(8)],
            len,
        }
    }

    /// Rebuild from packed bytes. Extra bytes are dropped, missing ones are
    /// zero-filled and padding bits past `len` are cleared.
    pub fn from_packed(mut bytes: Vec<u8>, len: usize) -> Self {
        bytes.resize(len.div_ceil(8), 0);
        let mut bits = Self { bytes, len };
        bits.clear_padding();
        bits
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The packed representation, `ceil(len / 8)` bytes.
    pub fn as_packed(&self) -> &[u8] {
        &self.bytes
    }

    pub fn get(&self, i: usize) -> bool {
        debug_assert!(i < self.len, "bit {i} out of range {}", self.len);
        self.bytes[i / 8] & mask(i) != 0
    }

    pub fn set(&mut self, i: usize) {
        debug_assert!(i < self.len, "bit {i} out of range {}", self.len);
        self.bytes[i / 8] |= mask(i);
    }

    pub fn assign(&mut self, i: usize, value: bool) {
        debug_assert!(i < self.len, "bit {i} out of range {}", self.len);
        if value {
            self.bytes[i / 8] |= mask(i);
        } else {
            self.bytes[i / 8] &= !mask(i);
        }
    }

    /// Reset every bit to zero.
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    pub fn count_ones(&self) -> usize {
        self.bytes.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Number of set bits in `start..end`.
    pub fn count_ones_in(&self, start: usize, end: usize) -> usize {
        (start..end).filter(|&i| self.get(i)).count()
    }

    /// Bitwise OR with an array of the same length.
    pub fn union_with(&mut self, other: &BitArray) {
        debug_assert_eq!(self.len, other.len);
        for (a, b) in self.bytes.iter_mut().zip(&other.bytes) {
            *a |= *b;
        }
    }

    /// Positions of all set bits, ascending.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| self.get(i))
    }

    fn clear_padding(&mut self) {
        let used = self.len % 8;
        if used != 0 {
            if let Some(last) = self.bytes.last_mut() {
                *last &= 0xFFu8 << (8 - used);
            }
        }
    }
}

#[inline]
fn mask(i: usize) -> u8 {
    0x80 >> (i % 8)
}
