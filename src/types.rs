use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Shape of a filter: hash rounds per element and logical bit-array width.
///
/// Both values are fixed for the lifetime of a filter. They are exactly the
/// two header fields of the binary format, so the ranges are those of the
/// header (`u8` and `u16`).
///
/// Sizing:
///   m = -n * ln(p) / ln(2)^2
///   k = (m / n) * ln(2)
///
///   1% FPR   → ~9.6 bits/key, 7 hashes
///   0.1% FPR → ~14.4 bits/key, 10 hashes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawParams", into = "RawParams")]
pub struct FilterParams {
    num_hashes: u8,
    num_bits: u16,
}

#[derive(Serialize, Deserialize)]
struct RawParams {
    num_hashes: u8,
    num_bits: u16,
}

impl TryFrom<RawParams> for FilterParams {
    type Error = Error;

    fn try_from(raw: RawParams) -> Result<Self> {
        FilterParams::new(raw.num_hashes, raw.num_bits)
    }
}

impl From<FilterParams> for RawParams {
    fn from(params: FilterParams) -> Self {
        RawParams {
            num_hashes: params.num_hashes,
            num_bits: params.num_bits,
        }
    }
}

impl FilterParams {
    /// Create parameters for a filter with `num_hashes` rounds over `num_bits` slots.
    ///
    /// `num_hashes == 0` is accepted (every query is vacuously true);
    /// `num_bits == 0` is rejected since no index can be computed.
    pub fn new(num_hashes: u8, num_bits: u16) -> Result<Self> {
        if num_bits == 0 {
            return Err(Error::InvalidParameter("num_bits must be > 0".into()));
        }
        Ok(Self {
            num_hashes,
            num_bits,
        })
    }

    /// Size a filter for `expected_items` at the given false positive rate.
    ///
    /// The result is clamped to what the header can express: at most
    /// `u16::MAX` bits and between 1 and `u8::MAX` hashes. Large capacities
    /// therefore end up with a worse rate than requested.
    pub fn for_capacity(expected_items: usize, false_positive_rate: f64) -> Result<Self> {
        if expected_items == 0 {
            return Err(Error::InvalidParameter("expected_items must be > 0".into()));
        }
        if !(false_positive_rate > 0.0 && false_positive_rate < 1.0) {
            return Err(Error::InvalidParameter(format!(
                "false_positive_rate must be in (0, 1), got {false_positive_rate}"
            )));
        }

        let n = expected_items as f64;
        let ln2 = std::f64::consts::LN_2;

        let bits = (-n * false_positive_rate.ln() / (ln2 * ln2)).ceil();
        let num_bits = bits.clamp(1.0, u16::MAX as f64) as u16;

        let hashes = ((num_bits as f64 / n) * ln2).round();
        let num_hashes = hashes.clamp(1.0, u8::MAX as f64) as u8;

        Self::new(num_hashes, num_bits)
    }

    /// Number of hash rounds per element.
    pub fn num_hashes(&self) -> u8 {
        self.num_hashes
    }

    /// Logical bit-array width.
    pub fn num_bits(&self) -> u16 {
        self.num_bits
    }

    /// Expected false positive rate after `items` distinct insertions,
    /// treating the salted rounds as independent: `(1 - e^{-kn/m})^k`.
    pub fn false_positive_rate(&self, items: usize) -> f64 {
        let k = self.num_hashes as f64;
        let m = self.num_bits as f64;
        let n = items as f64;
        (1.0 - (-k * n / m).exp()).powf(k)
    }

    /// Bytes needed to pack `num_bits` bits.
    pub fn packed_len(&self) -> usize {
        (self.num_bits as usize).div_ceil(8)
    }

    /// Bytes of a counting payload: one per counter.
    pub fn counter_len(&self) -> usize {
        self.num_bits as usize
    }

    /// Bytes needed to pack both planes of a paired filter.
    pub fn paired_packed_len(&self) -> usize {
        (2 * self.num_bits as usize).div_ceil(8)
    }
}

impl fmt::Display for FilterParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hashes={}, bits={}", self.num_hashes, self.num_bits)
    }
}
