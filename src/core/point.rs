//! Raw surface observations and discount inputs
//!
//! `RawSurfacePoint` is one observation of the implied-vol surface as returned
//! by the option-data collaborator. `DiscountInputs` carries the
//! forward/discount quantities produced by the discount collaborator; their
//! derivation is opaque to this crate.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One point of a raw implied-volatility surface.
///
/// Immutable once received from the option-data collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSurfacePoint {
    /// Option expiry date
    pub expiry: NaiveDate,
    /// Strike, expressed on the caller's grid convention
    /// (percent-of-spot moneyness for the standard skew report)
    pub strike: f64,
    /// Implied volatility at (expiry, strike)
    pub implied_vol: f64,
    /// Open interest, if the collaborator reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_interest: Option<u64>,
}

impl RawSurfacePoint {
    pub fn new(expiry: NaiveDate, strike: f64, implied_vol: f64) -> Self {
        Self {
            expiry,
            strike,
            implied_vol,
            open_interest: None,
        }
    }
}

/// How the forward/discount inputs are derived by the discount collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountMethod {
    /// Calibrate discount rates from put-call parity
    ImpliedForward,
    /// Use a supplied annualized dividend yield with a constant rate
    DividendYield,
}

impl DiscountMethod {
    /// Label used in run parameters and logs
    pub fn label(&self) -> &'static str {
        match self {
            DiscountMethod::ImpliedForward => "implied_forward",
            DiscountMethod::DividendYield => "dividend_yield",
        }
    }
}

/// Forward/discount curve inputs consumed by the surface computation.
///
/// Produced by a `DiscountCurveSource`; the numbers are taken as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountInputs {
    /// Annualized risk-free rate
    pub rate: f64,
    /// Annualized dividend yield
    pub dividend_yield: f64,
    /// Method that produced these inputs
    pub method: DiscountMethod,
}

impl DiscountInputs {
    /// Flat inputs with no dividend yield
    pub fn flat(rate: f64) -> Self {
        Self {
            rate,
            dividend_yield: 0.0,
            method: DiscountMethod::ImpliedForward,
        }
    }
}
