//! Option chain records
//!
//! Flat per-row view of an options chain: one record per listed contract
//! with the fields the surface pipeline needs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

/// One row of a flattened options chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionRecord {
    /// Strike price
    pub strike: f64,
    /// Expiration date
    pub expiry: NaiveDate,
    /// Exchange-supplied implied volatility, if quoted
    pub implied_vol: Option<f64>,
    /// Option type (Call/Put)
    pub option_type: OptionType,
}

impl OptionRecord {
    pub fn new(
        strike: f64,
        expiry: NaiveDate,
        implied_vol: Option<f64>,
        option_type: OptionType,
    ) -> Self {
        Self {
            strike,
            expiry,
            implied_vol,
            option_type,
        }
    }

    /// Moneyness: spot / strike
    pub fn moneyness(&self, spot: f64) -> f64 {
        spot / self.strike
    }

    /// Whole days from `from` until expiry (negative if already expired)
    pub fn days_to_expiry(&self, from: NaiveDate) -> i64 {
        (self.expiry - from).num_days()
    }
}

/// A full chain snapshot: spot price plus every listed contract,
/// all expirations flattened into one vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSnapshot {
    /// Underlying symbol
    pub ticker: String,
    /// Spot price at snapshot time
    pub spot: f64,
    /// Flattened chain rows
    pub records: Vec<OptionRecord>,
    /// Snapshot timestamp
    pub timestamp: DateTime<Utc>,
}

impl ChainSnapshot {
    pub fn new(ticker: impl Into<String>, spot: f64) -> Self {
        Self {
            ticker: ticker.into(),
            spot,
            records: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// All distinct expirations, sorted
    pub fn expiries(&self) -> Vec<NaiveDate> {
        let mut expiries: Vec<NaiveDate> = self.records.iter().map(|r| r.expiry).collect();
        expiries.sort();
        expiries.dedup();
        expiries
    }

    /// Rows that carry an implied volatility quote
    pub fn quoted_records(&self) -> Vec<&OptionRecord> {
        self.records
            .iter()
            .filter(|r| r.implied_vol.is_some())
            .collect()
    }
}
