//! # volbatch - Volatility Skew Batch Processing
//!
//! Turns raw per-ticker option-chain surfaces into normalized
//! volatility-surface artifacts (implied vol by tenor and strike) suitable
//! for visualization, processing tickers individually or as an unattended
//! batch.
//!
//! ## Overview
//!
//! The implied-vol solving and discount-curve estimation live behind
//! collaborator traits; this crate owns everything around them:
//!
//! - **Batch harness**: a timeout-bounded, failure-isolated job runner. A
//!   hung or broken ticker becomes an outcome entry, never a stalled batch.
//! - **Surface reshaping**: nearest-month tenor bucketing into a fixed-shape
//!   skew grid (every bucket, every candidate strike, `null` for gaps).
//! - **Report assembly**: the `data_dict` / `skew_dict` / `skew_data`
//!   JSON envelope with per-tenor skew slope summaries.
//! - **Numeric sanitization**: one boundary where non-finite and foreign
//!   numeric values become JSON-safe.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use volbatch::prelude::*;
//!
//! let chains = Arc::new(JsonChainSource::new("./data"));
//! let discounts = Arc::new(FlatDiscountSource::new(0.05));
//!
//! let universe = TickerUniverse::default_universe();
//! let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//! let specs = universe.to_specs(start, false);
//!
//! let store = ReportStore::new("./reports").unwrap();
//! let outcome = process_batch(
//!     &specs,
//!     chains,
//!     discounts,
//!     ReshapeConfig::default(),
//!     BatchConfig::default(),
//!     Some(&store),
//! )
//! .unwrap();
//!
//! println!("{} succeeded, {} failed", outcome.success_count(), outcome.failure_count());
//! ```
//!
//! ## What this crate does NOT do
//!
//! - Price options or solve for implied volatility
//! - Fit or interpolate curves (surfaces arrive already computed)
//! - Retry failed collaborators (retry policy belongs to the caller)

pub mod batch;
pub mod core;
pub mod data;
pub mod skew;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        DiscountInputs, DiscountMethod, RawSurfacePoint, TickerSpec, VolBatchError,
        VolBatchResult,
    };

    // Batch harness
    pub use crate::batch::{
        process_batch, process_single_ticker, BatchConfig, BatchOutcome, BatchRunner, JobFailure,
        JobFailureKind, TickerJob,
    };

    // Transformation pipeline
    pub use crate::skew::{
        build, reshape, MonthRounding, ReshapeConfig, SkewGrid, SkewReport, TenorRow,
        TickerResult,
    };

    // Collaborators and data helpers
    pub use crate::data::{
        DiscountCurveSource, DivYieldClient, FlatDiscountSource, JsonChainSource,
        OptionChainSource, ReportStore, TickerEntry, TickerUniverse,
    };
}

// Re-export main types at crate root
pub use crate::core::{VolBatchError, VolBatchResult};
