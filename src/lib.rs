//! # Voldash - Equity Options Volatility Dashboard
//!
//! A two-page analytics dashboard for equity options:
//! - **Implied Volatility**: builds an interpolated IV surface over a
//!   (moneyness, days-to-expiry) grid from a live options chain and renders
//!   it as an interactive 3D chart
//! - **Historical Volatility**: computes 20-day Bollinger Bands over a daily
//!   price series and renders line and candlestick overlays
//!
//! ## Key Components
//!
//! - **Data Fetching**: Yahoo Finance options chains and daily history
//! - **Surface Builder**: moneyness, day counts, scattered linear
//!   interpolation (Delaunay barycentric) onto a 100x100 grid
//! - **Indicators**: rolling mean/std and Bollinger Bands
//! - **Charts**: declarative plotly figures (surface, line, candlestick)
//! - **Pages**: one pure, synchronous pipeline per dashboard page
//!
//! ## Usage
//!
//! ```rust,no_run
//! use voldash::prelude::*;
//! use chrono::Utc;
//!
//! let client = YahooClient::new();
//! let today = Utc::now().date_naive();
//!
//! // Implied volatility surface for a ticker
//! let outcome = implied_volatility_page(&client, "AAPL", today).unwrap();
//! println!("Stock Price: ${:.2}", outcome.spot);
//!
//! // Bollinger Band charts over a date range
//! let request = HistoricalVolRequest::parse("AAPL", "2023-01-01").unwrap();
//! let outcome = historical_volatility_page(&client, &request, today).unwrap();
//! println!("{} daily bars", outcome.bars);
//! ```
//!
//! ## What This Crate Does NOT Do
//!
//! - Price options or compute Greeks
//! - Persist any market data
//! - Retry failed fetches or run anything concurrently

pub mod charts;
pub mod config;
pub mod core;
pub mod data;
pub mod indicators;
pub mod pages;
pub mod surface;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        ChainSnapshot, DashError, DashResult, OptionRecord, OptionType, PriceBar, PriceSeries,
    };

    // Data fetching
    pub use crate::data::{SpotQuote, YahooClient};

    // Surface construction
    pub use crate::surface::{
        build_surface, build_surface_from_records, IvSurfaceGrid, ScatteredInterpolator,
        GRID_POINTS,
    };

    // Indicators
    pub use crate::indicators::{
        rolling_mean, rolling_std, BollingerBands, BOLLINGER_K, BOLLINGER_WINDOW,
    };

    // Charts
    pub use crate::charts::{
        bollinger_chart, candlestick_chart, surface_chart, HistoricalVolCharts,
    };

    // Pages
    pub use crate::pages::{
        historical_volatility_page, implied_volatility_page, HistoricalVolOutcome,
        HistoricalVolRequest, ImpliedVolOutcome, Page,
    };

    // Configuration
    pub use crate::config::DashConfig;
}

// Re-export main types at crate root
pub use crate::core::{DashError, DashResult};
pub use crate::pages::Page;
