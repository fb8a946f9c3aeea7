//! Surface reshaping: raw (expiry × strike) points into a tenor-bucketed grid
//!
//! Bucketing works against calendar anchors: the nominal date of bucket `n` is
//! the observation date shifted forward by `n` calendar months (day-of-month
//! clamped). Each point lands in the bucket whose anchor is nearest to its
//! expiry; an exact half-month tie rounds toward the nearer future month by
//! default, configurable via [`MonthRounding`].
//!
//! When several expiries feed the same (bucket, strike) cell, the expiry
//! closest to the bucket's anchor wins; an exact distance tie prefers the
//! earlier expiry. Both rules are deterministic, so reshaping the same input
//! always yields an identical grid.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::{RawSurfacePoint, VolBatchError, VolBatchResult};

use super::SkewGrid;

/// Direction an exact half-month distance rounds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthRounding {
    /// Round toward the nearer future month (default)
    TowardFuture,
    /// Round toward the nearer past month
    TowardPast,
}

/// Configuration for surface reshaping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReshapeConfig {
    /// Candidate strike grid; every value appears as a key in every bucket
    pub strike_grid: Vec<f64>,
    /// Tenor horizon in whole months; buckets run `1..=bucket_count`
    pub bucket_count: u32,
    /// Half-month tie direction for nearest-month bucketing
    pub month_rounding: MonthRounding,
}

impl Default for ReshapeConfig {
    fn default() -> Self {
        Self {
            // Percent-of-spot moneyness grid of the standard skew report
            strike_grid: vec![80.0, 90.0, 100.0, 110.0, 120.0],
            bucket_count: 12,
            month_rounding: MonthRounding::TowardFuture,
        }
    }
}

impl ReshapeConfig {
    /// Horizon override keeping the default strike grid
    pub fn with_bucket_count(bucket_count: u32) -> Self {
        Self {
            bucket_count,
            ..Default::default()
        }
    }

    fn validate(&self) -> VolBatchResult<()> {
        if self.strike_grid.is_empty() {
            return Err(VolBatchError::transform("strike grid is empty"));
        }
        if self
            .strike_grid
            .iter()
            .any(|s| !s.is_finite() || *s <= 0.0)
        {
            return Err(VolBatchError::transform(
                "strike grid contains non-positive or non-finite strikes",
            ));
        }
        if self.bucket_count == 0 {
            return Err(VolBatchError::transform("bucket count must be at least 1"));
        }
        Ok(())
    }
}

/// Nominal anchor date of bucket `n`: observation shifted by `n` months.
///
/// `None` only on date overflow, which callers treat as "no bucket".
fn month_anchor(observation: NaiveDate, n: i64) -> Option<NaiveDate> {
    if n < 0 {
        return None;
    }
    observation.checked_add_months(Months::new(n as u32))
}

/// Whole-month distance from observation to expiry, rounded to the nearest
/// month. `None` for expiries on or before the observation date.
pub fn month_distance(
    observation: NaiveDate,
    expiry: NaiveDate,
    rounding: MonthRounding,
) -> Option<i64> {
    if expiry <= observation {
        return None;
    }

    // Largest n with anchor(n) <= expiry
    let mut lower = (expiry.year() as i64 - observation.year() as i64) * 12
        + (expiry.month() as i64 - observation.month() as i64);
    lower = lower.max(0);
    while lower > 0 && month_anchor(observation, lower)? > expiry {
        lower -= 1;
    }
    while month_anchor(observation, lower + 1)? <= expiry {
        lower += 1;
    }

    let to_lower = (expiry - month_anchor(observation, lower)?).num_days();
    let to_upper = (month_anchor(observation, lower + 1)? - expiry).num_days();

    let n = if to_lower < to_upper {
        lower
    } else if to_upper < to_lower {
        lower + 1
    } else {
        match rounding {
            MonthRounding::TowardFuture => lower + 1,
            MonthRounding::TowardPast => lower,
        }
    };
    Some(n)
}

/// Absolute distance in days from an expiry to its bucket's anchor.
fn anchor_distance(observation: NaiveDate, months: i64, expiry: NaiveDate) -> Option<i64> {
    let anchor = month_anchor(observation, months)?;
    Some((expiry - anchor).num_days().abs())
}

/// Reshape raw surface points into a fixed-shape tenor/strike grid.
///
/// Non-finite implied vols are treated as "no data" and filtered before
/// bucketing. Points whose bucket falls outside `1..=bucket_count` or whose
/// strike is not on the candidate grid are discarded. Degenerate inputs
/// (empty surface, non-positive strikes, empty grid) are transform errors.
pub fn reshape(
    points: &[RawSurfacePoint],
    observation: NaiveDate,
    config: &ReshapeConfig,
) -> VolBatchResult<SkewGrid> {
    config.validate()?;

    if points.is_empty() {
        return Err(VolBatchError::transform("surface has no expiries"));
    }
    if points.iter().any(|p| p.strike <= 0.0) {
        return Err(VolBatchError::transform(
            "surface contains non-positive strikes",
        ));
    }

    let mut grid = SkewGrid::empty(&config.strike_grid, config.bucket_count);
    // Winner per (bucket, strike) cell: (days from anchor, expiry)
    let mut winners: Vec<Option<(i64, NaiveDate)>> =
        vec![None; config.bucket_count as usize * config.strike_grid.len()];

    for point in points {
        if !point.implied_vol.is_finite() {
            continue;
        }
        let Some(months) = month_distance(observation, point.expiry, config.month_rounding) else {
            continue;
        };
        if months < 1 || months > config.bucket_count as i64 {
            continue;
        }
        let Some(strike_idx) = config
            .strike_grid
            .iter()
            .position(|&s| (s - point.strike).abs() < 1e-9)
        else {
            continue;
        };
        let Some(distance) = anchor_distance(observation, months, point.expiry) else {
            continue;
        };

        let cell = (months as usize - 1) * config.strike_grid.len() + strike_idx;
        let candidate = (distance, point.expiry);
        let wins = match winners[cell] {
            None => true,
            // Closest expiry to the bucket anchor wins; ties go to the
            // earlier expiry
            Some(current) => candidate < current,
        };
        if wins {
            winners[cell] = Some(candidate);
            grid.set(months as u32, strike_idx, point.implied_vol);
        }
    }

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn point(expiry: NaiveDate, strike: f64, vol: f64) -> RawSurfacePoint {
        RawSurfacePoint::new(expiry, strike, vol)
    }

    #[test]
    fn test_month_distance_basic() {
        let obs = date(2024, 1, 15);

        // 30 days out rounds to one month
        assert_eq!(
            month_distance(obs, date(2024, 2, 14), MonthRounding::TowardFuture),
            Some(1)
        );
        // Exactly one anchor away
        assert_eq!(
            month_distance(obs, date(2024, 2, 15), MonthRounding::TowardFuture),
            Some(1)
        );
        // A few days out rounds to zero months
        assert_eq!(
            month_distance(obs, date(2024, 1, 18), MonthRounding::TowardFuture),
            Some(0)
        );
        // Past or same-day expiries have no bucket
        assert_eq!(
            month_distance(obs, obs, MonthRounding::TowardFuture),
            None
        );
        assert_eq!(
            month_distance(obs, date(2024, 1, 1), MonthRounding::TowardFuture),
            None
        );
    }

    #[test]
    fn test_month_distance_long_tenor() {
        let obs = date(2024, 1, 15);
        assert_eq!(
            month_distance(obs, date(2025, 1, 15), MonthRounding::TowardFuture),
            Some(12)
        );
        assert_eq!(
            month_distance(obs, date(2025, 1, 3), MonthRounding::TowardFuture),
            Some(12)
        );
    }

    #[test]
    fn test_half_month_tie_rounds_toward_future() {
        // Anchors 2024-06-01 and 2024-07-01 are 30 days apart; 2024-06-16 is
        // exactly 15 days from each.
        let obs = date(2024, 5, 1);
        let tie = date(2024, 6, 16);

        assert_eq!(
            month_distance(obs, tie, MonthRounding::TowardFuture),
            Some(2)
        );
        assert_eq!(month_distance(obs, tie, MonthRounding::TowardPast), Some(1));
    }

    #[test]
    fn test_end_of_month_observation() {
        // Jan 31 anchors clamp: +1M = Feb 29 (leap year)
        let obs = date(2024, 1, 31);
        assert_eq!(
            month_distance(obs, date(2024, 2, 29), MonthRounding::TowardFuture),
            Some(1)
        );
        assert_eq!(
            month_distance(obs, date(2024, 3, 1), MonthRounding::TowardFuture),
            Some(1)
        );
    }

    #[test]
    fn test_reshape_end_to_end_single_expiry() {
        let obs = date(2024, 1, 15);
        let expiry = date(2024, 2, 14); // 30 days out
        let strikes = [80.0, 90.0, 100.0, 110.0, 120.0];
        let points: Vec<_> = strikes
            .iter()
            .map(|&s| point(expiry, s, 0.20 + (100.0 - s) * 0.001))
            .collect();

        let grid = reshape(&points, obs, &ReshapeConfig::default()).unwrap();

        assert_eq!(grid.bucket_count(), 12);
        for &s in &strikes {
            assert!(grid.vol(1, s).is_some(), "strike {} missing in 1M", s);
        }
        // Every other bucket is present and all-null
        for slice in &grid.buckets()[1..] {
            assert!(slice.is_all_null(), "{} should be empty", slice.label());
        }
    }

    #[test]
    fn test_reshape_missing_strike_is_null() {
        let obs = date(2024, 1, 15);
        let points = vec![point(date(2024, 2, 14), 100.0, 0.22)];

        let grid = reshape(&points, obs, &ReshapeConfig::default()).unwrap();

        assert_eq!(grid.vol(1, 100.0), Some(0.22));
        assert_eq!(grid.vol(1, 80.0), None);
        assert_eq!(grid.vol(1, 120.0), None);
    }

    #[test]
    fn test_reshape_discards_beyond_horizon() {
        let obs = date(2024, 1, 15);
        let points = vec![
            point(date(2024, 2, 14), 100.0, 0.22),
            point(date(2026, 1, 15), 100.0, 0.30), // 24 months, beyond 12
        ];

        let grid = reshape(&points, obs, &ReshapeConfig::default()).unwrap();

        assert_eq!(grid.vol(1, 100.0), Some(0.22));
        assert_eq!(grid.vol(12, 100.0), None);
    }

    #[test]
    fn test_collision_closest_expiry_wins() {
        // Bucket 1 anchor is 2024-06-01. 2024-06-03 (2 days) beats
        // 2024-05-25 (7 days).
        let obs = date(2024, 5, 1);
        let points = vec![
            point(date(2024, 5, 25), 100.0, 0.40),
            point(date(2024, 6, 3), 100.0, 0.20),
        ];

        let grid = reshape(&points, obs, &ReshapeConfig::default()).unwrap();
        assert_eq!(grid.vol(1, 100.0), Some(0.20));
    }

    #[test]
    fn test_collision_tie_prefers_earlier_expiry() {
        // 2024-05-25 and 2024-06-08 are both 7 days from the 2024-06-01
        // anchor; the earlier expiry wins, regardless of input order.
        let obs = date(2024, 5, 1);
        let earlier = point(date(2024, 5, 25), 100.0, 0.35);
        let later = point(date(2024, 6, 8), 100.0, 0.45);

        let grid_a = reshape(&[earlier.clone(), later.clone()], obs, &ReshapeConfig::default())
            .unwrap();
        let grid_b = reshape(&[later, earlier], obs, &ReshapeConfig::default()).unwrap();

        assert_eq!(grid_a.vol(1, 100.0), Some(0.35));
        assert_eq!(grid_b.vol(1, 100.0), Some(0.35));
    }

    #[test]
    fn test_non_finite_vols_are_no_data() {
        let obs = date(2024, 1, 15);
        let expiry = date(2024, 2, 14);
        let points = vec![
            point(expiry, 100.0, f64::NAN),
            point(expiry, 110.0, f64::INFINITY),
            point(expiry, 120.0, 0.25),
        ];

        let grid = reshape(&points, obs, &ReshapeConfig::default()).unwrap();

        assert_eq!(grid.vol(1, 100.0), None);
        assert_eq!(grid.vol(1, 110.0), None);
        assert_eq!(grid.vol(1, 120.0), Some(0.25));
    }

    #[test]
    fn test_non_finite_point_does_not_shadow_finite_one() {
        // The NaN point's expiry is closer to the anchor, but it carries no
        // data, so the finite point still populates the cell.
        let obs = date(2024, 5, 1);
        let points = vec![
            point(date(2024, 6, 2), 100.0, f64::NAN),
            point(date(2024, 6, 8), 100.0, 0.27),
        ];

        let grid = reshape(&points, obs, &ReshapeConfig::default()).unwrap();
        assert_eq!(grid.vol(1, 100.0), Some(0.27));
    }

    #[test]
    fn test_reshape_idempotent() {
        let obs = date(2024, 1, 15);
        let points = vec![
            point(date(2024, 2, 14), 100.0, 0.22),
            point(date(2024, 3, 14), 90.0, 0.26),
            point(date(2024, 7, 19), 110.0, 0.21),
        ];
        let config = ReshapeConfig::default();

        let first = reshape(&points, obs, &config).unwrap();
        let second = reshape(&points, obs, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_degenerate_inputs_rejected() {
        let obs = date(2024, 1, 15);
        let valid = vec![point(date(2024, 2, 14), 100.0, 0.22)];

        assert!(matches!(
            reshape(&[], obs, &ReshapeConfig::default()),
            Err(VolBatchError::Transform(_))
        ));
        assert!(matches!(
            reshape(
                &[point(date(2024, 2, 14), -100.0, 0.22)],
                obs,
                &ReshapeConfig::default()
            ),
            Err(VolBatchError::Transform(_))
        ));

        let empty_grid = ReshapeConfig {
            strike_grid: vec![],
            ..Default::default()
        };
        assert!(matches!(
            reshape(&valid, obs, &empty_grid),
            Err(VolBatchError::Transform(_))
        ));

        let zero_buckets = ReshapeConfig {
            bucket_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            reshape(&valid, obs, &zero_buckets),
            Err(VolBatchError::Transform(_))
        ));
    }
}
