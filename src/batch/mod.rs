//! Batch execution harness
//!
//! `BatchRunner` schedules per-ticker jobs under a hard wall-clock budget;
//! `process_single_ticker` / `process_batch` are the convenience entry
//! points for one-off and unattended runs.

pub mod job;
pub mod runner;

pub use job::*;
pub use runner::*;

use std::sync::Arc;

use crate::core::{TickerSpec, VolBatchResult};
use crate::data::{DiscountCurveSource, OptionChainSource, ReportStore};
use crate::skew::ReshapeConfig;

/// Process one ticker, optionally persisting the report.
///
/// Runs under the same timeout harness as a batch, so a hung collaborator
/// still yields a `Timeout` entry instead of blocking the caller forever.
pub fn process_single_ticker(
    spec: TickerSpec,
    chains: Arc<dyn OptionChainSource>,
    discounts: Arc<dyn DiscountCurveSource>,
    reshape: ReshapeConfig,
    config: BatchConfig,
    store: Option<&ReportStore>,
) -> VolBatchResult<BatchOutcome> {
    process_batch(&[spec], chains, discounts, reshape, config, store)
}

/// Process a batch of tickers, optionally persisting each success.
///
/// Persistence failures are logged and do not fail the batch; the outcome
/// already carries the in-memory results.
pub fn process_batch(
    specs: &[TickerSpec],
    chains: Arc<dyn OptionChainSource>,
    discounts: Arc<dyn DiscountCurveSource>,
    reshape: ReshapeConfig,
    config: BatchConfig,
    store: Option<&ReportStore>,
) -> VolBatchResult<BatchOutcome> {
    let runner = BatchRunner::new(chains, discounts)
        .with_reshape(reshape)
        .with_config(config);

    let outcome = runner.run(specs)?;

    if let Some(store) = store {
        for result in outcome.successes() {
            if let Err(e) = store.save(result) {
                tracing::warn!("Failed to save report for {}: {}", result.ticker, e);
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DiscountInputs, DiscountMethod, RawSurfacePoint};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    struct OneSurface;

    impl OptionChainSource for OneSurface {
        fn fetch_surface(
            &self,
            _ticker: &str,
            _start_date: NaiveDate,
            _discount: &DiscountInputs,
        ) -> VolBatchResult<Vec<RawSurfacePoint>> {
            let expiry = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
            Ok(vec![
                RawSurfacePoint::new(expiry, 100.0, 0.22),
                RawSurfacePoint::new(expiry, 110.0, 0.20),
            ])
        }
    }

    struct FlatDiscounts;

    impl DiscountCurveSource for FlatDiscounts {
        fn discount_inputs(
            &self,
            _ticker: &str,
            dividend_yield: Option<f64>,
            method: DiscountMethod,
        ) -> VolBatchResult<DiscountInputs> {
            Ok(DiscountInputs {
                rate: 0.05,
                dividend_yield: dividend_yield.unwrap_or(0.0),
                method,
            })
        }
    }

    #[test]
    fn test_single_ticker_saves_report() {
        let dir = tempdir().unwrap();
        let store = ReportStore::new(dir.path()).unwrap();
        let spec = TickerSpec::new("AAPL", NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());

        let outcome = process_single_ticker(
            spec,
            Arc::new(OneSurface),
            Arc::new(FlatDiscounts),
            ReshapeConfig::default(),
            BatchConfig::default(),
            Some(&store),
        )
        .unwrap();

        assert_eq!(outcome.success_count(), 1);
        assert!(dir.path().join("AAPL.json").exists());
    }

    #[test]
    fn test_batch_without_store() {
        let specs = vec![
            TickerSpec::new("AAPL", NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()),
            TickerSpec::new("MSFT", NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()),
        ];

        let outcome = process_batch(
            &specs,
            Arc::new(OneSurface),
            Arc::new(FlatDiscounts),
            ReshapeConfig::default(),
            BatchConfig::default(),
            None,
        )
        .unwrap();

        assert_eq!(outcome.len(), 2);
        assert_eq!(outcome.success_count(), 2);
    }
}
