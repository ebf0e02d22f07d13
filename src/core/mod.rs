//! Core data types for the volatility dashboard
//!
//! Defines fundamental types:
//! - OptionRecord: strike, expiry, implied vol, type (call/put)
//! - ChainSnapshot: spot price + flattened chain rows
//! - PriceBar / PriceSeries: daily OHLC + adjusted close
//! - DashError: error taxonomy shared by every pipeline

pub mod bars;
pub mod error;
pub mod option;

pub use bars::*;
pub use error::*;
pub use option::*;
