//! Page pipelines
//!
//! One linear pipeline per dashboard page, each a pure
//! fetch -> transform -> chart pass. Any error aborts the page render;
//! in particular an EmptyData result short-circuits before any downstream
//! computation runs.

use std::str::FromStr;

use chrono::NaiveDate;
use plotly::Plot;

use crate::charts::{bollinger_chart, candlestick_chart, surface_chart, HistoricalVolCharts};
use crate::core::{DashError, DashResult};
use crate::data::YahooClient;
use crate::indicators::BollingerBands;
use crate::surface::build_surface;

/// Dashboard page selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    ImpliedVolatility,
    HistoricalVolatility,
}

impl Page {
    /// Display label, matching the sidebar option names
    pub fn label(&self) -> &'static str {
        match self {
            Page::ImpliedVolatility => "Implied Volatility",
            Page::HistoricalVolatility => "Historical Volatility",
        }
    }
}

impl FromStr for Page {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "iv" | "implied" | "implied-volatility" => Ok(Page::ImpliedVolatility),
            "hist" | "historical" | "historical-volatility" => Ok(Page::HistoricalVolatility),
            other => Err(DashError::invalid_input(format!(
                "unknown page '{other}'; expected 'implied-volatility' or 'historical-volatility'"
            ))),
        }
    }
}

/// Inputs for the historical volatility page
#[derive(Debug, Clone)]
pub struct HistoricalVolRequest {
    /// Underlying symbol
    pub ticker: String,
    /// First date of the price window
    pub start: NaiveDate,
}

impl HistoricalVolRequest {
    /// Build a request from the free-text inputs the page exposes:
    /// a ticker and an ISO "YYYY-MM-DD" start date.
    pub fn parse(ticker: &str, start: &str) -> DashResult<Self> {
        let ticker = normalize_ticker(ticker)?;
        let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").map_err(|e| {
            DashError::invalid_input(format!("start date must be YYYY-MM-DD: {e}"))
        })?;
        Ok(Self { ticker, start })
    }
}

/// Result of the implied volatility page
pub struct ImpliedVolOutcome {
    /// Spot price used for the moneyness axis, echoed to the user
    pub spot: f64,
    /// Number of chain rows fetched
    pub rows: usize,
    /// 3D surface figure
    pub plot: Plot,
}

/// Result of the historical volatility page
pub struct HistoricalVolOutcome {
    /// Number of daily bars in the window
    pub bars: usize,
    /// Both figures
    pub charts: HistoricalVolCharts,
}

impl std::fmt::Debug for ImpliedVolOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImpliedVolOutcome")
            .field("spot", &self.spot)
            .field("rows", &self.rows)
            .field("plot", &"<Plot>")
            .finish()
    }
}

impl std::fmt::Debug for HistoricalVolOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoricalVolOutcome")
            .field("bars", &self.bars)
            .field("charts", &"<HistoricalVolCharts>")
            .finish()
    }
}

/// Implied volatility page: chain snapshot -> surface grid -> 3D chart.
pub fn implied_volatility_page(
    client: &YahooClient,
    ticker: &str,
    today: NaiveDate,
) -> DashResult<ImpliedVolOutcome> {
    let ticker = normalize_ticker(ticker)?;

    let snapshot = client.get_option_records(&ticker)?;
    let grid = build_surface(&snapshot, today)?;

    Ok(ImpliedVolOutcome {
        spot: snapshot.spot,
        rows: snapshot.records.len(),
        plot: surface_chart(&grid),
    })
}

/// Historical volatility page: daily bars -> Bollinger Bands -> two charts.
///
/// An empty fetch result stops the pipeline here; the rolling-window
/// computation never sees an empty series.
pub fn historical_volatility_page(
    client: &YahooClient,
    request: &HistoricalVolRequest,
    end: NaiveDate,
) -> DashResult<HistoricalVolOutcome> {
    let series = client.get_daily_history(&request.ticker, request.start, end)?;

    let bands = BollingerBands::from_series(&series);
    if bands.is_all_undefined() {
        tracing::warn!(
            "Only {} bars for {}; bands need a full 20-day window",
            series.len(),
            series.ticker
        );
    }

    Ok(HistoricalVolOutcome {
        bars: series.len(),
        charts: HistoricalVolCharts {
            bollinger: bollinger_chart(&series, &bands),
            technical: candlestick_chart(&series, &bands),
        },
    })
}

fn normalize_ticker(ticker: &str) -> DashResult<String> {
    let trimmed = ticker.trim();
    if trimmed.is_empty() {
        return Err(DashError::invalid_input("ticker symbol must be non-empty"));
    }
    Ok(trimmed.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_page_parsing() {
        assert_eq!("iv".parse::<Page>().unwrap(), Page::ImpliedVolatility);
        assert_eq!(
            "Historical-Volatility".parse::<Page>().unwrap(),
            Page::HistoricalVolatility
        );
        assert!("greeks".parse::<Page>().is_err());

        assert_eq!(Page::ImpliedVolatility.label(), "Implied Volatility");
    }

    #[test]
    fn test_request_parsing() {
        let req = HistoricalVolRequest::parse(" aapl ", "2023-01-01").unwrap();
        assert_eq!(req.ticker, "AAPL");
        assert_eq!(req.start, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());

        assert!(HistoricalVolRequest::parse("AAPL", "01/01/2023").is_err());
        assert!(HistoricalVolRequest::parse("", "2023-01-01").is_err());
    }

    #[test]
    fn test_empty_ticker_rejected_before_fetch() {
        let client = YahooClient::new();
        let err = implied_volatility_page(&client, "  ", Utc::now().date_naive()).unwrap_err();
        assert!(matches!(err, DashError::InvalidInput(_)));
    }

    #[test]
    #[ignore] // Requires network
    fn test_implied_volatility_page_live() {
        let client = YahooClient::new();
        let outcome =
            implied_volatility_page(&client, "AAPL", Utc::now().date_naive()).unwrap();

        assert!(outcome.spot > 0.0);
        assert!(outcome.rows >= 3);
    }

    #[test]
    #[ignore] // Requires network
    fn test_unknown_ticker_no_chart() {
        let client = YahooClient::new();
        let today = Utc::now().date_naive();

        let err = implied_volatility_page(&client, "ZZZZZZZZ", today).unwrap_err();
        assert!(err.is_empty_data());

        let req = HistoricalVolRequest::parse("ZZZZZZZZ", "2023-01-01").unwrap();
        let err = historical_volatility_page(&client, &req, today).unwrap_err();
        assert!(err.is_empty_data());
    }
}
