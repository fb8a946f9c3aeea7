//! Per-ticker report persistence
//!
//! Writes one JSON document per processed ticker with the
//! `data_dict` / `skew_dict` / `skew_data` envelope, passing the whole tree
//! through the numeric sanitization boundary so non-finite values land as
//! `null` in the artifact.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{VolBatchError, VolBatchResult};
use crate::skew::sanitize::sanitize_value;
use crate::skew::TickerResult;

/// Writes ticker reports into an output directory
pub struct ReportStore {
    out_dir: PathBuf,
}

impl ReportStore {
    /// Create a store, making the output directory if needed
    pub fn new(out_dir: impl Into<PathBuf>) -> VolBatchResult<Self> {
        let out_dir = out_dir.into();
        if !out_dir.exists() {
            fs::create_dir_all(&out_dir)?;
        }
        Ok(Self { out_dir })
    }

    /// Path the given ticker's report is written to
    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.out_dir.join(format!("{}.json", ticker))
    }

    /// Persist one ticker result, returning the written path
    pub fn save(&self, result: &TickerResult) -> VolBatchResult<PathBuf> {
        let value = serde_json::to_value(result)
            .map_err(|e| VolBatchError::serialization(e.to_string()))?;
        let value = sanitize_value(value);

        let json = serde_json::to_string_pretty(&value)
            .map_err(|e| VolBatchError::serialization(e.to_string()))?;

        let path = self.path_for(&result.ticker);
        fs::write(&path, json)?;

        tracing::info!("Saved report for {} at {:?}", result.ticker, path);
        Ok(path)
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DiscountInputs, RawSurfacePoint, TickerSpec};
    use crate::skew::{build, reshape, ReshapeConfig};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn sample_result() -> TickerResult {
        let obs = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
        let points = vec![
            RawSurfacePoint::new(expiry, 100.0, 0.22),
            RawSurfacePoint::new(expiry, 110.0, 0.20),
        ];
        let config = ReshapeConfig::default();
        let grid = reshape(&points, obs, &config).unwrap();
        build(
            &TickerSpec::new("AAPL", obs),
            &DiscountInputs::flat(0.05),
            &points,
            grid,
            &config,
        )
    }

    #[test]
    fn test_save_writes_envelope() {
        let dir = tempdir().unwrap();
        let store = ReportStore::new(dir.path()).unwrap();

        let path = store.save(&sample_result()).unwrap();
        assert_eq!(path, dir.path().join("AAPL.json"));

        let json = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("data_dict").is_some());
        assert!(value.get("skew_dict").is_some());
        assert!(value.get("skew_data").is_some());
        assert_eq!(value["skew_dict"]["1M"]["100"], serde_json::json!(0.22));
        assert!(value["skew_dict"]["1M"]["80"].is_null());
    }

    #[test]
    fn test_creates_output_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("reports").join("daily");

        let store = ReportStore::new(&nested).unwrap();
        store.save(&sample_result()).unwrap();
        assert!(nested.join("AAPL.json").exists());
    }
}
