//! Chart specification builders
//!
//! Pure transforms from pipeline outputs to declarative plotly figures.
//! Nothing here performs IO; the caller decides how to display or persist
//! the returned `Plot` objects.

use plotly::common::color::NamedColor;
use plotly::common::{ColorBar, ColorScale, ColorScalePalette, Fill, Marker, Mode, Title};
use plotly::layout::{Axis, HoverMode, LayoutScene};
use plotly::{Candlestick, Layout, Plot, Scatter, Surface};

use crate::core::PriceSeries;
use crate::indicators::BollingerBands;
use crate::surface::IvSurfaceGrid;

/// Both figures produced by the historical volatility page
pub struct HistoricalVolCharts {
    /// Close price with band overlays
    pub bollinger: Plot,
    /// Candlestick chart with bands and band-distance trace
    pub technical: Plot,
}

/// 3D implied volatility surface figure
pub fn surface_chart(grid: &IvSurfaceGrid) -> Plot {
    // plotly expects z indexed [y][x]; the grid stores [moneyness, days],
    // so rows here run over the days axis.
    let z: Vec<Vec<f64>> = (0..grid.days_axis.len())
        .map(|j| {
            (0..grid.moneyness_axis.len())
                .map(|i| grid.iv[[i, j]])
                .collect()
        })
        .collect();

    let trace = Surface::new(z)
        .x(grid.moneyness_axis.clone())
        .y(grid.days_axis.clone())
        .color_scale(ColorScale::Palette(ColorScalePalette::Viridis))
        .color_bar(ColorBar::new().title(Title::with_text("Implied Volatility")))
        .hover_template(
            "Moneyness: %{x}<br>Time to Expiration: %{y} days<br>Implied Volatility: %{z}<extra></extra>",
        );

    let hidden_axis = || {
        Axis::new()
            .show_grid(false)
            .zero_line(false)
            .show_tick_labels(false)
    };

    let layout = Layout::new()
        .title(Title::with_text(&format!(
            "Implied Volatility Surface for {}",
            grid.ticker
        )))
        .scene(
            LayoutScene::new()
                .x_axis(hidden_axis())
                .y_axis(hidden_axis())
                .z_axis(hidden_axis()),
        )
        .auto_size(true)
        .height(800)
        .width(1200);

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(layout);
    plot
}

/// Line chart of close price with upper/lower bands and SMA(20)
pub fn bollinger_chart(series: &PriceSeries, bands: &BollingerBands) -> Plot {
    let dates = date_labels(series);
    let closes = series.adj_closes();

    let mut plot = Plot::new();
    plot.add_trace(
        Scatter::new(dates.clone(), closes)
            .mode(Mode::Lines)
            .name("Closing Prices"),
    );
    plot.add_trace(
        Scatter::new(dates.clone(), bands.upper.clone())
            .mode(Mode::Lines)
            .name("Upper Bollinger Band"),
    );
    plot.add_trace(
        Scatter::new(dates.clone(), bands.lower.clone())
            .mode(Mode::Lines)
            .name("Lower Bollinger Band"),
    );
    plot.add_trace(
        Scatter::new(dates, bands.sma.clone())
            .mode(Mode::Lines)
            .name("SMA(20)"),
    );

    plot.set_layout(
        Layout::new()
            .x_axis(Axis::new().title(Title::with_text("Date")))
            .y_axis(Axis::new().title(Title::with_text("Price")))
            .hover_mode(HoverMode::X),
    );
    plot
}

/// Candlestick chart with band overlays and the band-distance trace
pub fn candlestick_chart(series: &PriceSeries, bands: &BollingerBands) -> Plot {
    let dates = date_labels(series);

    let open: Vec<f64> = series.bars.iter().map(|b| b.open).collect();
    let high: Vec<f64> = series.bars.iter().map(|b| b.high).collect();
    let low: Vec<f64> = series.bars.iter().map(|b| b.low).collect();
    let close: Vec<f64> = series.bars.iter().map(|b| b.close).collect();

    let mut plot = Plot::new();
    plot.add_trace(Candlestick::new(dates.clone(), open, high, low, close));
    plot.add_trace(
        Scatter::new(dates.clone(), bands.upper.clone())
            .mode(Mode::Lines)
            .name("Upper Bollinger Band")
            .marker(Marker::new().color(NamedColor::Violet)),
    );
    plot.add_trace(
        Scatter::new(dates.clone(), bands.lower.clone())
            .mode(Mode::Lines)
            .fill(Fill::ToNextY)
            .name("Lower Bollinger Band")
            .marker(Marker::new().color(NamedColor::Violet)),
    );
    plot.add_trace(
        Scatter::new(dates.clone(), bands.sma.clone())
            .mode(Mode::Lines)
            .name("SMA(20)")
            .marker(Marker::new().color(NamedColor::Yellow)),
    );
    plot.add_trace(
        Scatter::new(dates, bands.distance.clone())
            .mode(Mode::Lines)
            .name("Volatility (Bollinger Band Distance)")
            .marker(Marker::new().color(NamedColor::LightGray)),
    );

    plot.set_layout(
        Layout::new()
            .title(Title::with_text(&format!(
                "Technical analysis of {}",
                series.ticker
            )))
            .x_axis(Axis::new().title(Title::with_text("Date")))
            .y_axis(Axis::new().title(Title::with_text("Price")))
            .hover_mode(HoverMode::X)
            .plot_background_color(NamedColor::Black)
            .height(800)
            .width(1200),
    );
    plot
}

fn date_labels(series: &PriceSeries) -> Vec<String> {
    series
        .bars
        .iter()
        .map(|b| b.date.format("%Y-%m-%d").to_string())
        .collect()
}
