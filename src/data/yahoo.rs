//! Yahoo Finance data fetcher
//!
//! Fetches free options chains and daily price history for US equities.
//! Uses Yahoo Finance's unofficial API.
//!
//! Note: This is for educational/research purposes. Yahoo Finance
//! data is delayed ~15 minutes and intended for personal use.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{
    ChainSnapshot, DashError, DashResult, OptionRecord, OptionType, PriceBar, PriceSeries,
};

/// Yahoo Finance API client
pub struct YahooClient {
    client: reqwest::blocking::Client,
    options_url: String,
    chart_url: String,
}

impl YahooClient {
    pub fn new() -> Self {
        Self::with_base_urls(
            "https://query1.finance.yahoo.com/v7/finance/options",
            "https://query1.finance.yahoo.com/v8/finance/chart",
        )
    }

    /// Client pointed at custom API endpoints
    pub fn with_base_urls(
        options_url: impl Into<String>,
        chart_url: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::blocking::Client::builder()
                .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
                .build()
                .expect("Failed to create HTTP client"),
            options_url: options_url.into(),
            chart_url: chart_url.into(),
        }
    }

    /// Get current spot quote for a symbol
    pub fn get_quote(&self, symbol: &str) -> DashResult<SpotQuote> {
        // The options endpoint echoes the underlying quote; one request
        // serves both the spot price and the expiration list.
        let chain = self.fetch_chain_page(symbol, None)?;

        Ok(SpotQuote {
            symbol: symbol.to_string(),
            price: chain.quote.regular_market_price,
            timestamp: Utc::now(),
        })
    }

    /// Get available option expiration dates
    pub fn get_expirations(&self, symbol: &str) -> DashResult<Vec<NaiveDate>> {
        let chain = self.fetch_chain_page(symbol, None)?;
        let expiries = expiries_from_page(&chain);

        if expiries.is_empty() {
            return Err(DashError::empty_data(format!(
                "no option expirations listed for {symbol}"
            )));
        }

        Ok(expiries)
    }

    /// Get the flattened option chain for a specific expiration
    pub fn get_option_chain(
        &self,
        symbol: &str,
        expiry: NaiveDate,
    ) -> DashResult<Vec<OptionRecord>> {
        let expiry_ts = expiry
            .and_hms_opt(16, 0, 0)
            .expect("valid wall-clock time")
            .and_utc()
            .timestamp();

        let chain = self.fetch_chain_page(symbol, Some(expiry_ts))?;

        let mut records = Vec::new();
        if let Some(options) = chain.options.first() {
            for call in &options.calls {
                if let Some(record) = convert_option_record(call, expiry, OptionType::Call) {
                    records.push(record);
                }
            }
            for put in &options.puts {
                if let Some(record) = convert_option_record(put, expiry, OptionType::Put) {
                    records.push(record);
                }
            }
        }

        Ok(records)
    }

    /// Get the full chain snapshot: spot price plus every expiration,
    /// flattened into one record vector.
    ///
    /// Any failed per-expiry fetch aborts the snapshot; a surface is never
    /// built from a partially fetched chain.
    pub fn get_option_records(&self, symbol: &str) -> DashResult<ChainSnapshot> {
        // One page serves both the spot price and the expiration list
        let page = self.fetch_chain_page(symbol, None)?;
        let expiries = expiries_from_page(&page);

        if expiries.is_empty() {
            return Err(DashError::empty_data(format!(
                "no option expirations listed for {symbol}"
            )));
        }

        let mut snapshot = ChainSnapshot::new(symbol, page.quote.regular_market_price);

        for expiry in expiries {
            snapshot.records.extend(self.get_option_chain(symbol, expiry)?);
        }

        if snapshot.records.is_empty() {
            return Err(DashError::empty_data(format!(
                "no option rows returned for {symbol}"
            )));
        }

        tracing::info!(
            "Fetched {} option rows for {} (spot {:.2})",
            snapshot.records.len(),
            symbol,
            snapshot.spot
        );

        Ok(snapshot)
    }

    /// Get daily OHLC + adjusted-close bars over [start, end]
    pub fn get_daily_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DashResult<PriceSeries> {
        let period1 = start
            .and_hms_opt(0, 0, 0)
            .expect("valid wall-clock time")
            .and_utc()
            .timestamp();
        let period2 = end
            .and_hms_opt(23, 59, 59)
            .expect("valid wall-clock time")
            .and_utc()
            .timestamp();

        let url = format!(
            "{}/{}?period1={}&period2={}&interval=1d&events=div%2Csplit",
            self.chart_url, symbol, period1, period2
        );

        let response: YahooChartResponse = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DashError::Network(e.to_string()))?
            .json()
            .map_err(|e| DashError::Data(format!("Failed to parse chart: {}", e)))?;

        let result = response
            .chart
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| {
                DashError::empty_data(format!("no price history returned for {symbol}"))
            })?;

        let quote = result
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DashError::data("chart response missing quote columns"))?;
        let adjclose = result
            .indicators
            .adjclose
            .unwrap_or_default()
            .into_iter()
            .next();

        let mut series = PriceSeries::new(symbol);
        for (i, &ts) in result.timestamp.iter().enumerate() {
            let Some(date) = DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()) else {
                continue;
            };

            // Yahoo pads holidays with null rows; skip incomplete bars
            let (open, high, low, close) = match (
                quote.open.get(i).copied().flatten(),
                quote.high.get(i).copied().flatten(),
                quote.low.get(i).copied().flatten(),
                quote.close.get(i).copied().flatten(),
            ) {
                (Some(o), Some(h), Some(l), Some(c)) => (o, h, l, c),
                _ => continue,
            };

            let adj_close = adjclose
                .as_ref()
                .and_then(|a| a.adjclose.get(i).copied().flatten())
                .unwrap_or(close);

            series.add_bar(PriceBar {
                date,
                open,
                high,
                low,
                close,
                adj_close,
            });
        }

        if series.is_empty() {
            return Err(DashError::empty_data(format!(
                "no daily bars for {symbol} in [{start}, {end}]"
            )));
        }

        tracing::info!("Fetched {} daily bars for {}", series.len(), symbol);

        Ok(series)
    }

    /// Fetch one page of the options endpoint, optionally for a given expiry
    fn fetch_chain_page(
        &self,
        symbol: &str,
        expiry_ts: Option<i64>,
    ) -> DashResult<YahooOptionChainData> {
        let url = match expiry_ts {
            Some(ts) => format!("{}/{}?date={}", self.options_url, symbol, ts),
            None => format!("{}/{}", self.options_url, symbol),
        };

        let response: YahooOptionsResponse = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DashError::Network(e.to_string()))?
            .json()
            .map_err(|e| DashError::Data(format!("Failed to parse options: {}", e)))?;

        response
            .option_chain
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| DashError::empty_data(format!("no options data returned for {symbol}")))
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Expiration timestamps of an options page as calendar dates
fn expiries_from_page(page: &YahooOptionChainData) -> Vec<NaiveDate> {
    page.expiration_dates
        .iter()
        .filter_map(|&ts| DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()))
        .collect()
}

/// Convert a Yahoo option row to our flat record format
fn convert_option_record(
    data: &YahooOptionData,
    expiry: NaiveDate,
    option_type: OptionType,
) -> Option<OptionRecord> {
    let strike = data.strike?;
    Some(OptionRecord::new(
        strike,
        expiry,
        data.implied_volatility,
        option_type,
    ))
}

/// Spot price quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotQuote {
    pub symbol: String,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

// Yahoo Finance API response structures

#[derive(Debug, Deserialize)]
struct YahooOptionsResponse {
    #[serde(rename = "optionChain")]
    option_chain: YahooOptionChain,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChain {
    result: Option<Vec<YahooOptionChainData>>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChainData {
    #[serde(rename = "expirationDates", default)]
    expiration_dates: Vec<i64>,
    quote: YahooQuoteData,
    #[serde(default)]
    options: Vec<YahooOptions>,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteData {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: f64,
}

#[derive(Debug, Deserialize)]
struct YahooOptions {
    #[serde(default)]
    calls: Vec<YahooOptionData>,
    #[serde(default)]
    puts: Vec<YahooOptionData>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionData {
    strike: Option<f64>,
    #[serde(rename = "impliedVolatility")]
    implied_volatility: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooChartResult>>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuoteColumns>,
    adjclose: Option<Vec<YahooAdjClose>>,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct YahooAdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    /// Serve `responses` one per connection on a local port, in order.
    fn serve_canned(responses: Vec<String>) -> (String, std::thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = std::thread::spawn(move || {
            for body in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut buf = [0u8; 2048];
                let _ = stream.read(&mut buf).unwrap();
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                stream.write_all(response.as_bytes()).unwrap();
            }
        });

        (format!("http://{addr}"), handle)
    }

    fn options_page_json() -> String {
        r#"{"optionChain":{"result":[{
            "expirationDates":[1750000000],
            "quote":{"regularMarketPrice":150.0},
            "options":[]
        }]}}"#
            .to_string()
    }

    #[test]
    fn test_failed_expiry_fetch_aborts_snapshot() {
        // First request: the options page (spot + expiration list).
        // Second request: the per-expiry chain, answered with a malformed
        // body. The snapshot must fail rather than render from partial data.
        let (url, handle) = serve_canned(vec![
            options_page_json(),
            "not json".to_string(),
        ]);

        let client = YahooClient::with_base_urls(url.clone(), format!("{url}/chart"));
        let err = client.get_option_records("AAPL").unwrap_err();
        assert!(matches!(err, DashError::Data(_)), "got {err:?}");

        handle.join().unwrap();
    }

    #[test]
    fn test_page_without_expirations_is_empty_data() {
        let body = r#"{"optionChain":{"result":[{
            "expirationDates":[],
            "quote":{"regularMarketPrice":150.0},
            "options":[]
        }]}}"#
            .to_string();
        let (url, handle) = serve_canned(vec![body]);

        let client = YahooClient::with_base_urls(url.clone(), format!("{url}/chart"));
        let err = client.get_option_records("AAPL").unwrap_err();
        assert!(err.is_empty_data(), "got {err:?}");

        handle.join().unwrap();
    }

    #[test]
    fn test_convert_option_record() {
        let expiry = NaiveDate::from_ymd_opt(2026, 6, 19).unwrap();
        let data = YahooOptionData {
            strike: Some(150.0),
            implied_volatility: Some(0.25),
        };

        let record = convert_option_record(&data, expiry, OptionType::Call).unwrap();
        assert_eq!(record.option_type, OptionType::Call);
        assert_eq!(record.implied_vol, Some(0.25));

        // Rows without a strike are dropped
        let no_strike = YahooOptionData {
            strike: None,
            implied_volatility: Some(0.3),
        };
        assert!(convert_option_record(&no_strike, expiry, OptionType::Put).is_none());
    }

    #[test]
    #[ignore] // Requires network
    fn test_get_quote() {
        let client = YahooClient::new();
        let quote = client.get_quote("AAPL").unwrap();

        assert!(quote.price > 0.0);
        println!("AAPL price: {}", quote.price);
    }

    #[test]
    #[ignore] // Requires network
    fn test_get_option_records() {
        let client = YahooClient::new();
        let snapshot = client.get_option_records("AAPL").unwrap();

        assert!(!snapshot.records.is_empty());
        println!(
            "AAPL: {} rows, {} expiries",
            snapshot.records.len(),
            snapshot.expiries().len()
        );
    }

    #[test]
    #[ignore] // Requires network
    fn test_unknown_ticker_is_empty_data() {
        let client = YahooClient::new();
        let err = client.get_option_records("ZZZZZZZZ").unwrap_err();
        assert!(err.is_empty_data());
    }

    #[test]
    #[ignore] // Requires network
    fn test_get_daily_history() {
        let client = YahooClient::new();
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let end = Utc::now().date_naive();

        let series = client.get_daily_history("AAPL", start, end).unwrap();
        assert!(series.len() > 100);
    }
}
