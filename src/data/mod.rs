//! Collaborator seams and data helpers
//!
//! Handles:
//! - Trait seams for the external option-data and discount collaborators
//! - Ticker universe configuration (symbol map with dividend yields)
//! - Dividend yield scraping
//! - File-backed collaborator implementations for offline runs
//! - Per-ticker JSON report persistence

pub mod divyield;
pub mod jsonfile;
pub mod store;
pub mod universe;

pub use divyield::*;
pub use jsonfile::*;
pub use store::*;
pub use universe::*;

use chrono::NaiveDate;

use crate::core::{DiscountInputs, DiscountMethod, RawSurfacePoint, VolBatchResult};

/// Option-data collaborator: produces the raw implied-vol surface for a
/// ticker. The solver behind it (chain retrieval, IV computation) is opaque
/// to this crate.
///
/// Implementations must be shareable across job threads.
pub trait OptionChainSource: Send + Sync {
    /// Fetch the raw surface for option trades from `start_date` onward,
    /// using the supplied forward/discount inputs.
    fn fetch_surface(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        discount: &DiscountInputs,
    ) -> VolBatchResult<Vec<RawSurfacePoint>>;
}

/// Discount collaborator: produces forward/discount inputs for a ticker.
/// The estimation algorithm is opaque to this crate.
pub trait DiscountCurveSource: Send + Sync {
    fn discount_inputs(
        &self,
        ticker: &str,
        dividend_yield: Option<f64>,
        method: DiscountMethod,
    ) -> VolBatchResult<DiscountInputs>;
}
