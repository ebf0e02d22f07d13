//! Volatility Dashboard
//!
//! Entry point: pick a page, run its pipeline, write the chart(s) to HTML.
//!
//! Usage:
//!   dashboard <implied-volatility|historical-volatility> [TICKER] [START]

use chrono::Utc;

use voldash::prelude::*;

fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    let page: Page = match args.get(1).map(String::as_str).unwrap_or("iv").parse() {
        Ok(page) => page,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    let config = DashConfig::default();
    let client = YahooClient::new();
    let today = Utc::now().date_naive();

    println!("Volatility Dashboard - {}", page.label());
    println!("=====================================\n");

    let result = match page {
        Page::ImpliedVolatility => {
            let ticker = args
                .get(2)
                .cloned()
                .unwrap_or_else(|| config.default_ticker.clone());

            implied_volatility_page(&client, &ticker, today).map(|outcome| {
                println!("Stock Price: ${:.2}", outcome.spot);
                println!("Chain rows: {}", outcome.rows);

                let path = config.output_dir.join("iv_surface.html");
                outcome.plot.write_html(&path);
                println!("Surface chart written to {}", path.display());
            })
        }
        Page::HistoricalVolatility => {
            let ticker = args
                .get(2)
                .cloned()
                .unwrap_or_else(|| config.default_ticker.clone());
            let start = args
                .get(3)
                .cloned()
                .unwrap_or_else(|| config.default_start.to_string());

            HistoricalVolRequest::parse(&ticker, &start).and_then(|request| {
                historical_volatility_page(&client, &request, today).map(|outcome| {
                    println!("Daily bars: {}", outcome.bars);

                    let bollinger_path = config.output_dir.join("bollinger.html");
                    outcome.charts.bollinger.write_html(&bollinger_path);
                    println!("Bollinger chart written to {}", bollinger_path.display());

                    let technical_path = config.output_dir.join("technical.html");
                    outcome.charts.technical.write_html(&technical_path);
                    println!("Technical chart written to {}", technical_path.display());
                })
            })
        }
    };

    match result {
        Ok(()) => println!("\n--- Done ---"),
        Err(e) if e.is_empty_data() => {
            // Ticker unknown or no rows for the requested range
            eprintln!("No data found. Please check the ticker symbol: {e}");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Page render failed: {e}");
            std::process::exit(1);
        }
    }
}
