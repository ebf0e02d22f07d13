//! Daily price bars
//!
//! OHLC + adjusted-close time series for the historical volatility page.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily bar
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading date
    pub date: NaiveDate,
    /// Open price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Close price
    pub close: f64,
    /// Split/dividend adjusted close
    pub adj_close: f64,
}

/// Chronologically ordered daily bars for one ticker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Underlying symbol
    pub ticker: String,
    /// Bars in chronological order, one per trading day
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            bars: Vec::new(),
        }
    }

    /// Add a bar, keeping the series sorted and duplicate-date free.
    /// A bar for an already-present date replaces the existing one.
    pub fn add_bar(&mut self, bar: PriceBar) {
        match self.bars.binary_search_by_key(&bar.date, |b| b.date) {
            Ok(i) => self.bars[i] = bar,
            Err(i) => self.bars.insert(i, bar),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Dates column
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// Adjusted-close column
    pub fn adj_closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.adj_close).collect()
    }

    /// Close column
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}
