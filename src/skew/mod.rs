//! Skew grid transformation pipeline
//!
//! Reshapes a raw (expiry × strike) implied-vol surface into a tenor-bucketed
//! skew grid and assembles the per-ticker report envelope.
//!
//! Three stages:
//! 1. **Reshape**: nearest-month bucketing, collision resolution, fixed-shape grid
//! 2. **Report**: `data_dict` / `skew_dict` / `skew_data` envelope with skew slopes
//! 3. **Sanitize**: JSON-safe numeric encoding at the serialization boundary

pub mod reshape;
pub mod report;
pub mod sanitize;

pub use reshape::*;
pub use report::*;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Decimal-formatted strike key used in the JSON grid ("80", "82.5").
pub fn strike_key(strike: f64) -> String {
    format!("{}", strike)
}

/// Tenor label for a whole-month bucket ("1M", "2M", ...).
pub fn tenor_label(months: u32) -> String {
    format!("{}M", months)
}

/// One tenor bucket of the skew grid: implied vols across the candidate
/// strike grid, `None` where no surviving observation supplied data.
#[derive(Debug, Clone, PartialEq)]
pub struct TenorSlice {
    /// Whole-month tenor of this bucket
    pub months: u32,
    vols: Vec<Option<f64>>,
}

impl TenorSlice {
    fn empty(months: u32, strike_count: usize) -> Self {
        Self {
            months,
            vols: vec![None; strike_count],
        }
    }

    /// Tenor label ("1M", "2M", ...)
    pub fn label(&self) -> String {
        tenor_label(self.months)
    }

    /// Vol at the given strike index, `None` if missing
    pub fn vol_at(&self, strike_idx: usize) -> Option<f64> {
        self.vols.get(strike_idx).copied().flatten()
    }

    /// True if no strike in this bucket has data
    pub fn is_all_null(&self) -> bool {
        self.vols.iter().all(|v| v.is_none())
    }
}

/// Tenor-bucketed skew grid with a fixed shape.
///
/// Shape invariant: every bucket `1..=bucket_count` is present and every
/// bucket holds exactly the candidate strike keys, so the JSON layout is
/// identical across tickers. Missing data is `null`, never omission.
#[derive(Debug, Clone, PartialEq)]
pub struct SkewGrid {
    strikes: Vec<f64>,
    buckets: Vec<TenorSlice>,
}

impl SkewGrid {
    /// All-null grid over the candidate strikes and `1..=bucket_count` tenors.
    pub(crate) fn empty(strike_grid: &[f64], bucket_count: u32) -> Self {
        let buckets = (1..=bucket_count)
            .map(|m| TenorSlice::empty(m, strike_grid.len()))
            .collect();
        Self {
            strikes: strike_grid.to_vec(),
            buckets,
        }
    }

    pub(crate) fn set(&mut self, months: u32, strike_idx: usize, vol: f64) {
        if months >= 1 {
            if let Some(slice) = self.buckets.get_mut((months - 1) as usize) {
                if let Some(slot) = slice.vols.get_mut(strike_idx) {
                    *slot = Some(vol);
                }
            }
        }
    }

    /// Candidate strike grid, in caller order
    pub fn strikes(&self) -> &[f64] {
        &self.strikes
    }

    /// Number of tenor buckets
    pub fn bucket_count(&self) -> u32 {
        self.buckets.len() as u32
    }

    /// Tenor buckets in ascending month order
    pub fn buckets(&self) -> &[TenorSlice] {
        &self.buckets
    }

    /// Vol at (months, strike), `None` if missing or outside the grid
    pub fn vol(&self, months: u32, strike: f64) -> Option<f64> {
        let slice = self.buckets.get(months.checked_sub(1)? as usize)?;
        let idx = self
            .strikes
            .iter()
            .position(|&s| (s - strike).abs() < 1e-9)?;
        slice.vol_at(idx)
    }
}

// Serializes to {"1M": {"80": 0.25, ...}, "2M": {...}} with buckets in tenor
// order and strikes in grid order.
impl Serialize for SkewGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut outer = serializer.serialize_map(Some(self.buckets.len()))?;
        for slice in &self.buckets {
            let row: Vec<(String, Option<f64>)> = self
                .strikes
                .iter()
                .zip(&slice.vols)
                .map(|(&s, &v)| (strike_key(s), v))
                .collect();
            outer.serialize_entry(&slice.label(), &SliceMap(&row))?;
        }
        outer.end()
    }
}

struct SliceMap<'a>(&'a [(String, Option<f64>)]);

impl Serialize for SliceMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, vol) in self.0 {
            map.serialize_entry(key, vol)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_grid_shape() {
        let grid = SkewGrid::empty(&[80.0, 90.0, 100.0, 110.0, 120.0], 12);

        assert_eq!(grid.bucket_count(), 12);
        for slice in grid.buckets() {
            assert!(slice.is_all_null());
        }
        assert_eq!(grid.buckets()[0].label(), "1M");
        assert_eq!(grid.buckets()[11].label(), "12M");
    }

    #[test]
    fn test_strike_keys() {
        assert_eq!(strike_key(80.0), "80");
        assert_eq!(strike_key(82.5), "82.5");
        assert_eq!(strike_key(100.0), "100");
    }

    #[test]
    fn test_json_layout() {
        let mut grid = SkewGrid::empty(&[80.0, 100.0, 120.0], 2);
        grid.set(1, 1, 0.25);

        let value = serde_json::to_value(&grid).unwrap();
        let obj = value.as_object().unwrap();

        // Every bucket present, every strike key present
        assert_eq!(obj.len(), 2);
        let one_m = obj["1M"].as_object().unwrap();
        assert_eq!(one_m.len(), 3);
        assert_eq!(one_m["100"], serde_json::json!(0.25));
        assert!(one_m["80"].is_null());
        assert!(obj["2M"]["120"].is_null());
    }

    #[test]
    fn test_vol_lookup() {
        let mut grid = SkewGrid::empty(&[80.0, 100.0], 3);
        grid.set(2, 0, 0.31);

        assert_eq!(grid.vol(2, 80.0), Some(0.31));
        assert_eq!(grid.vol(2, 100.0), None);
        assert_eq!(grid.vol(1, 80.0), None);
        // Outside the grid
        assert_eq!(grid.vol(4, 80.0), None);
        assert_eq!(grid.vol(2, 95.0), None);
    }
}
