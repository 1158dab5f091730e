use crate::bloom::{CountingBloomFilter, OrdinaryBloomFilter, PairedBloomFilter};
use crate::error::Result;
use crate::hash::Fnv1;
use crate::types::FilterParams;

/// Convenience builder for any filter variant.
///
/// Usage:
/// 1. Start from explicit params or from an expected capacity and FPR
/// 2. Optionally swap the hasher
/// 3. Call one of the `build_*` methods
///
/// ```
/// use bloom_variants::{BloomFilter, FilterBuilder, Xxh3};
///
/// let mut filter = FilterBuilder::for_capacity(1000, 0.01)
///     .unwrap()
///     .hasher(Xxh3)
///     .build_ordinary::<str>();
/// filter.insert("apple");
/// assert!(filter.query("apple"));
/// ```
#[derive(Debug, Clone)]
pub struct FilterBuilder<H = Fnv1> {
    params: FilterParams,
    hasher: H,
}

impl FilterBuilder<Fnv1> {
    /// Builder for filters of exactly this shape.
    pub fn new(params: FilterParams) -> Self {
        Self {
            params,
            hasher: Fnv1,
        }
    }

    /// Builder sized for `expected_items` at `false_positive_rate`.
    pub fn for_capacity(expected_items: usize, false_positive_rate: f64) -> Result<Self> {
        Ok(Self::new(FilterParams::for_capacity(
            expected_items,
            false_positive_rate,
        )?))
    }
}

impl<H> FilterBuilder<H> {
    /// Replace the hasher.
    pub fn hasher<H2>(self, hasher: H2) -> FilterBuilder<H2> {
        FilterBuilder {
            params: self.params,
            hasher,
        }
    }

    pub fn params(&self) -> FilterParams {
        self.params
    }

    pub fn build_ordinary<T: ?Sized>(self) -> OrdinaryBloomFilter<T, H> {
        OrdinaryBloomFilter::with_hasher(self.params, self.hasher)
    }

    pub fn build_counting<T: ?Sized>(self) -> CountingBloomFilter<T, H> {
        CountingBloomFilter::with_hasher(self.params, self.hasher)
    }

    pub fn build_paired<T: ?Sized>(self) -> PairedBloomFilter<T, H> {
        PairedBloomFilter::with_hasher(self.params, self.hasher)
    }
}
