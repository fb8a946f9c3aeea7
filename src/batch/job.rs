//! A single ticker's unit of work
//!
//! Fetches inputs from the collaborators, reshapes the surface and builds
//! the report. A job owns everything it touches (spec clone, `Arc`s to the
//! shared collaborators), so the runner can abandon it mid-flight without
//! leaking resources: whenever the job's thread eventually finishes, its
//! state is dropped with it.

use std::sync::Arc;

use crate::core::TickerSpec;
use crate::data::{DiscountCurveSource, OptionChainSource};
use crate::skew::{build, reshape, ReshapeConfig, TickerResult};
use crate::VolBatchResult;

pub struct TickerJob {
    spec: TickerSpec,
    chains: Arc<dyn OptionChainSource>,
    discounts: Arc<dyn DiscountCurveSource>,
    reshape: ReshapeConfig,
}

impl TickerJob {
    pub fn new(
        spec: TickerSpec,
        chains: Arc<dyn OptionChainSource>,
        discounts: Arc<dyn DiscountCurveSource>,
        reshape: ReshapeConfig,
    ) -> Self {
        Self {
            spec,
            chains,
            discounts,
            reshape,
        }
    }

    /// Run the full pipeline for this ticker.
    ///
    /// Collaborator failures surface as `Upstream`/`Network` errors, reshape
    /// failures as `Transform`; the runner classifies them. No retries here:
    /// retry policy belongs to the collaborator or the runner's caller.
    pub fn execute(self) -> VolBatchResult<TickerResult> {
        tracing::info!("Starting volatility processing for {}", self.spec.ticker);

        let discount = self.discounts.discount_inputs(
            &self.spec.ticker,
            self.spec.dividend_yield,
            self.spec.discount_method,
        )?;

        let points =
            self.chains
                .fetch_surface(&self.spec.ticker, self.spec.start_date, &discount)?;
        tracing::debug!(
            "Fetched {} surface points for {}",
            points.len(),
            self.spec.ticker
        );

        let grid = reshape(&points, self.spec.start_date, &self.reshape)?;

        Ok(build(&self.spec, &discount, &points, grid, &self.reshape))
    }
}
