//! File-backed collaborators
//!
//! Loads surfaces fetched by an external tool from JSON files, letting the
//! full pipeline run without live collaborators (offline runs, tests).
//! Expected layout: one `<TICKER>_surface.json` per ticker holding an array
//! of raw surface points.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::core::{
    DiscountInputs, DiscountMethod, RawSurfacePoint, VolBatchError, VolBatchResult,
};

use super::{DiscountCurveSource, OptionChainSource};

/// Option-data collaborator reading pre-fetched surfaces from disk
pub struct JsonChainSource {
    dir: PathBuf,
}

impl JsonChainSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn surface_path(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{}_surface.json", ticker))
    }
}

impl OptionChainSource for JsonChainSource {
    fn fetch_surface(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        _discount: &DiscountInputs,
    ) -> VolBatchResult<Vec<RawSurfacePoint>> {
        let path = self.surface_path(ticker);
        let file = File::open(&path).map_err(|e| {
            VolBatchError::upstream(format!("no surface file for {} at {:?}: {}", ticker, path, e))
        })?;

        let points: Vec<RawSurfacePoint> = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| {
                VolBatchError::upstream(format!("malformed surface file for {}: {}", ticker, e))
            })?;

        // Only option trades from the start date onward belong to the run
        Ok(points
            .into_iter()
            .filter(|p| p.expiry >= start_date)
            .collect())
    }
}

/// Discount collaborator handing back a constant rate.
///
/// Stands in for the external curve estimation when running from files; the
/// dividend yield comes from the spec (or 0.0 for parity calibration, where
/// the real collaborator would solve for it).
pub struct FlatDiscountSource {
    pub rate: f64,
}

impl FlatDiscountSource {
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }
}

impl DiscountCurveSource for FlatDiscountSource {
    fn discount_inputs(
        &self,
        _ticker: &str,
        dividend_yield: Option<f64>,
        method: DiscountMethod,
    ) -> VolBatchResult<DiscountInputs> {
        Ok(DiscountInputs {
            rate: self.rate,
            dividend_yield: dividend_yield.unwrap_or(0.0),
            method,
        })
    }
}
