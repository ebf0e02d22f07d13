//! Market data fetching
//!
//! Handles:
//! - Yahoo Finance API for options chains and spot quotes (free)
//! - Yahoo Finance chart API for daily price history

pub mod yahoo;

pub use yahoo::*;
