//! Batch work items
//!
//! A `TickerSpec` is everything one job needs, passed by value at call time.
//! There is no process-wide parameter state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::point::DiscountMethod;

/// Specification for one ticker's processing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSpec {
    /// Ticker symbol as understood by the option-data collaborator
    pub ticker: String,
    /// Display name, when the universe supplies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Earliest option trade date to include; also the observation date
    /// for tenor bucketing
    pub start_date: NaiveDate,
    /// Annualized dividend yield, when the `DividendYield` method is used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<f64>,
    /// Discount derivation method
    pub discount_method: DiscountMethod,
}

impl TickerSpec {
    /// Spec using put-call parity calibration (no dividend input needed)
    pub fn new(ticker: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            ticker: ticker.into(),
            name: None,
            start_date,
            dividend_yield: None,
            discount_method: DiscountMethod::ImpliedForward,
        }
    }

    /// Spec using a known annualized dividend yield
    pub fn with_dividend_yield(
        ticker: impl Into<String>,
        start_date: NaiveDate,
        dividend_yield: f64,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            name: None,
            start_date,
            dividend_yield: Some(dividend_yield),
            discount_method: DiscountMethod::DividendYield,
        }
    }
}
