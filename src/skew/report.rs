//! Per-ticker report assembly
//!
//! Builds the three-part output envelope consumed by the rendering frontend:
//! - `data_dict`: the raw surface plus the run parameters that produced it
//! - `skew_dict`: the tenor-bucketed skew grid
//! - `skew_data`: per-tenor summary rows (wing vols, skew slopes) nested with
//!   the ticker and start date so the section is self-describing on its own
//!
//! Assembly is a pure function of its inputs: no I/O, no external calls.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::{DiscountInputs, RawSurfacePoint, TickerSpec};

use super::{ReshapeConfig, SkewGrid};

/// Moneyness levels the summary rows report on, when present in the grid
const WING_STRIKES: [f64; 5] = [80.0, 90.0, 100.0, 110.0, 120.0];

/// Run parameters echoed into `data_dict` so the artifact records how it
/// was produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunParams {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub discount_method: &'static str,
    pub rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<f64>,
    pub bucket_count: u32,
    pub strike_grid: Vec<f64>,
}

/// Raw surface plus run parameters
#[derive(Debug, Clone, Serialize)]
pub struct DataDict {
    pub params: RunParams,
    pub surface: Vec<RawSurfacePoint>,
}

/// One summary row of the skew report.
///
/// Key names match the persisted artifact's historical layout.
#[derive(Debug, Clone, Serialize)]
pub struct TenorRow {
    #[serde(rename = "80%")]
    pub pct_80: Option<f64>,
    #[serde(rename = "90%")]
    pub pct_90: Option<f64>,
    #[serde(rename = "ATM")]
    pub atm: Option<f64>,
    #[serde(rename = "110%")]
    pub pct_110: Option<f64>,
    #[serde(rename = "120%")]
    pub pct_120: Option<f64>,
    #[serde(rename = "-20% Skew")]
    pub skew_down_20: Option<f64>,
    #[serde(rename = "-10% Skew")]
    pub skew_down_10: Option<f64>,
    #[serde(rename = "+10% Skew")]
    pub skew_up_10: Option<f64>,
    #[serde(rename = "+20% Skew")]
    pub skew_up_20: Option<f64>,
    pub label: String,
}

/// Self-describing skew summary: per-tenor rows plus ticker/date metadata
#[derive(Debug, Clone, Serialize)]
pub struct SkewReport {
    pub skew_dict: BTreeMap<u32, TenorRow>,
    pub ticker: String,
    pub start_date: NaiveDate,
}

/// Complete per-ticker output record.
///
/// Owned by the job that produced it until handed to the batch runner;
/// read-only thereafter.
#[derive(Debug, Clone, Serialize)]
pub struct TickerResult {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub data_dict: DataDict,
    pub skew_dict: SkewGrid,
    pub skew_data: SkewReport,
}

/// Round to 2 decimals, the precision the skew slope columns report at
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Skew slope between a wing and ATM, per percentage point of moneyness
fn slope(wing: Option<f64>, atm: Option<f64>, gap: f64) -> Option<f64> {
    match (wing, atm) {
        (Some(w), Some(a)) => Some(round2((w - a) / gap)),
        _ => None,
    }
}

fn tenor_row(grid: &SkewGrid, months: u32) -> TenorRow {
    let [w80, w90, atm, w110, w120] = WING_STRIKES.map(|s| grid.vol(months, s));

    TenorRow {
        pct_80: w80,
        pct_90: w90,
        atm,
        pct_110: w110,
        pct_120: w120,
        skew_down_20: slope(w80, atm, 20.0),
        skew_down_10: slope(w90, atm, 20.0),
        skew_up_10: slope(w110, atm, 20.0),
        skew_up_20: slope(w120, atm, 20.0),
        label: months.to_string(),
    }
}

/// Assemble the full per-ticker envelope from a reshaped grid.
pub fn build(
    spec: &TickerSpec,
    discount: &DiscountInputs,
    points: &[RawSurfacePoint],
    grid: SkewGrid,
    config: &ReshapeConfig,
) -> TickerResult {
    let params = RunParams {
        ticker: spec.ticker.clone(),
        start_date: spec.start_date,
        discount_method: discount.method.label(),
        rate: discount.rate,
        dividend_yield: spec.dividend_yield,
        bucket_count: config.bucket_count,
        strike_grid: config.strike_grid.clone(),
    };

    let rows: BTreeMap<u32, TenorRow> = (1..=grid.bucket_count())
        .map(|m| (m, tenor_row(&grid, m)))
        .collect();

    let skew_data = SkewReport {
        skew_dict: rows,
        ticker: spec.ticker.clone(),
        start_date: spec.start_date,
    };

    TickerResult {
        ticker: spec.ticker.clone(),
        start_date: spec.start_date,
        data_dict: DataDict {
            params,
            surface: points.to_vec(),
        },
        skew_dict: grid,
        skew_data,
    }
}
