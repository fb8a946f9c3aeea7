//! Core data types for volbatch
//!
//! Defines fundamental types:
//! - RawSurfacePoint: one (expiry, strike, implied vol) observation
//! - DiscountInputs: forward/discount quantities from the discount collaborator
//! - TickerSpec: one batch work item
//! - VolBatchError: crate-wide error taxonomy

pub mod error;
pub mod point;
pub mod ticker;

pub use error::*;
pub use point::*;
pub use ticker::*;
