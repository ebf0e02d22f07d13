//! Dashboard configuration
//!
//! Explicit configuration handed to the entry point; the pipelines
//! themselves stay side-effect-free and take their inputs as arguments.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashConfig {
    /// Ticker used when none is supplied
    pub default_ticker: String,
    /// Start date used by the historical page when none is supplied
    pub default_start: NaiveDate,
    /// Directory chart HTML files are written to
    pub output_dir: PathBuf,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            default_ticker: "AAPL".to_string(),
            default_start: NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid date"),
            output_dir: PathBuf::from("."),
        }
    }
}
