//! Value to frequency mapping
//!
//! Spreads the distinct values of a grid evenly across a frequency band:
//! the smallest value sounds at `min_hz`, the largest at `max_hz`, and each
//! value in between one `step` higher than its predecessor.

use crate::error::{Error, Result};
use crate::grid::Grid;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Default lower bound of the band
pub const DEFAULT_MIN_HZ: f64 = 200.0;
/// Default upper bound of the band
pub const DEFAULT_MAX_HZ: f64 = 2000.0;
/// Default decimal places kept in inverse keys
pub const DEFAULT_PRECISION: u32 = 5;

/// Forward mapping from distinct value to frequency in Hz
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyMap {
    min_hz: f64,
    max_hz: f64,
    step: f64,
    frequencies: BTreeMap<u8, f64>,
}

impl FrequencyMap {
    /// Build the mapping for the distinct values present in `grid`
    pub fn build(grid: &Grid, min_hz: f64, max_hz: f64) -> Result<Self> {
        Self::from_values(&grid.distinct_values(), min_hz, max_hz)
    }

    /// Build the mapping for already sorted, deduplicated values
    pub fn from_values(sorted: &[u8], min_hz: f64, max_hz: f64) -> Result<Self> {
        if sorted.len() < 2 {
            return Err(Error::DegenerateMapping {
                distinct: sorted.len(),
            });
        }

        let step = (max_hz - min_hz) / (sorted.len() - 1) as f64;
        let frequencies = sorted
            .iter()
            .enumerate()
            .map(|(i, &value)| (value, min_hz + i as f64 * step))
            .collect();

        debug!(distinct = sorted.len(), step, "built frequency map");
        Ok(Self {
            min_hz,
            max_hz,
            step,
            frequencies,
        })
    }

    /// Frequency assigned to `value`, if it appeared in the grid
    pub fn frequency(&self, value: u8) -> Option<f64> {
        self.frequencies.get(&value).copied()
    }

    /// Spacing between neighbouring frequencies
    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn min_hz(&self) -> f64 {
        self.min_hz
    }

    pub fn max_hz(&self) -> f64 {
        self.max_hz
    }

    /// Number of distinct values mapped
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// (value, frequency) pairs in ascending value order
    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.frequencies.iter().map(|(&v, &f)| (v, f))
    }

    /// Build the approximate inverse, keyed by frequency rounded to
    /// `precision` decimal places
    pub fn inverse(&self, precision: u32) -> InverseFrequencyMap {
        let mut inverse = InverseFrequencyMap::new(precision);
        for (value, freq) in self.iter() {
            inverse.insert(freq, value);
        }
        inverse
    }
}

/// Approximate inverse of a [`FrequencyMap`]
///
/// Keys are frequencies rounded to a fixed number of decimal places, stored
/// as scaled integers. Two frequencies closer than the rounding resolution
/// would share a key; the first value inserted keeps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InverseFrequencyMap {
    precision: u32,
    values: HashMap<i64, u8>,
}

impl InverseFrequencyMap {
    /// Create an empty inverse map
    pub fn new(precision: u32) -> Self {
        Self {
            precision,
            values: HashMap::new(),
        }
    }

    fn key(&self, freq: f64) -> i64 {
        (freq * 10f64.powi(self.precision as i32)).round() as i64
    }

    /// Round `freq` to the map's precision
    pub fn round(&self, freq: f64) -> f64 {
        self.key(freq) as f64 / 10f64.powi(self.precision as i32)
    }

    /// Record that `freq` decodes to `value`
    pub fn insert(&mut self, freq: f64, value: u8) {
        let key = self.key(freq);
        if let Some(&existing) = self.values.get(&key) {
            warn!(freq, existing, value, "frequency collision after rounding");
            return;
        }
        self.values.insert(key, value);
    }

    /// Value whose frequency rounds to the same key as `freq`
    pub fn lookup(&self, freq: f64) -> Option<u8> {
        self.values.get(&self.key(freq)).copied()
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// (rounded frequency, value) pairs in ascending frequency order
    pub fn entries(&self) -> Vec<(f64, u8)> {
        let scale = 10f64.powi(self.precision as i32);
        let mut entries: Vec<(i64, u8)> = self.values.iter().map(|(&k, &v)| (k, v)).collect();
        entries.sort_unstable_by_key(|&(k, _)| k);
        entries
            .into_iter()
            .map(|(k, v)| (k as f64 / scale, v))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridPolicy;
    use crate::ingest::NumberSequence;

    fn grid(values: &[i64]) -> Grid {
        Grid::from_sequence(&NumberSequence::new(values.to_vec()), GridPolicy::Truncate).unwrap()
    }

    #[test]
    fn test_four_values_across_default_band() {
        let map = FrequencyMap::build(&grid(&[1, 2, 3, 4]), DEFAULT_MIN_HZ, DEFAULT_MAX_HZ).unwrap();

        assert_eq!(map.step(), 600.0);
        assert_eq!(map.frequency(1), Some(200.0));
        assert_eq!(map.frequency(2), Some(800.0));
        assert_eq!(map.frequency(3), Some(1400.0));
        assert_eq!(map.frequency(4), Some(2000.0));
        assert_eq!(map.frequency(5), None);
    }

    #[test]
    fn test_single_distinct_value_is_degenerate() {
        assert!(matches!(
            FrequencyMap::build(&grid(&[5, 5, 5, 5]), DEFAULT_MIN_HZ, DEFAULT_MAX_HZ),
            Err(Error::DegenerateMapping { distinct: 1 })
        ));
        assert!(matches!(
            FrequencyMap::from_values(&[], DEFAULT_MIN_HZ, DEFAULT_MAX_HZ),
            Err(Error::DegenerateMapping { distinct: 0 })
        ));
    }

    #[test]
    fn test_strictly_increasing() {
        let values: Vec<u8> = (0..=255).collect();
        let map = FrequencyMap::from_values(&values, DEFAULT_MIN_HZ, DEFAULT_MAX_HZ).unwrap();
        let freqs: Vec<f64> = map.iter().map(|(_, f)| f).collect();

        assert_eq!(freqs.len(), 256);
        assert!(freqs.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(freqs[0], DEFAULT_MIN_HZ);
        assert!((freqs[255] - DEFAULT_MAX_HZ).abs() < 1e-9);
    }

    #[test]
    fn test_inverse_round_trip() {
        let values: Vec<u8> = vec![0, 3, 17, 42, 99, 100, 128, 200, 255];
        let map = FrequencyMap::from_values(&values, DEFAULT_MIN_HZ, DEFAULT_MAX_HZ).unwrap();
        let inverse = map.inverse(DEFAULT_PRECISION);

        assert_eq!(inverse.len(), values.len());
        for (value, freq) in map.iter() {
            assert_eq!(inverse.lookup(inverse.round(freq)), Some(value));
            assert_eq!(inverse.lookup(freq), Some(value));
        }
    }

    #[test]
    fn test_inverse_round_trip_full_byte_range() {
        let values: Vec<u8> = (0..=255).collect();
        let map = FrequencyMap::from_values(&values, DEFAULT_MIN_HZ, DEFAULT_MAX_HZ).unwrap();
        let inverse = map.inverse(DEFAULT_PRECISION);

        for (value, freq) in map.iter() {
            assert_eq!(inverse.lookup(freq), Some(value));
        }
    }

    #[test]
    fn test_inverse_entries_sorted_and_rounded() {
        let map = FrequencyMap::from_values(&[1, 2, 3, 4], DEFAULT_MIN_HZ, DEFAULT_MAX_HZ).unwrap();
        let entries = map.inverse(DEFAULT_PRECISION).entries();
        assert_eq!(
            entries,
            vec![(200.0, 1), (800.0, 2), (1400.0, 3), (2000.0, 4)]
        );
    }

    #[test]
    fn test_inverse_rounding_is_approximate() {
        let map = FrequencyMap::from_values(&[10, 20, 30], 200.0, 300.0).unwrap();
        let inverse = map.inverse(0);

        assert_eq!(inverse.lookup(250.4), Some(20));
        assert_eq!(inverse.lookup(249.6), Some(20));
        assert_eq!(inverse.lookup(251.0), None);
    }

    #[test]
    fn test_collision_keeps_first_value() {
        let mut inverse = InverseFrequencyMap::new(0);
        inverse.insert(440.1, 1);
        inverse.insert(440.2, 2);

        assert_eq!(inverse.len(), 1);
        assert_eq!(inverse.lookup(440.0), Some(1));
    }
}
