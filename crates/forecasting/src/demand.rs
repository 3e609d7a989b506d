//! N-day demand forecast with confidence bands and stockout projection.
//!
//! Model:
//! - Baseline: arithmetic mean of the full daily series.
//! - Trend: OLS slope over the most recent [`TREND_WINDOW_DAYS`] days, expressed
//!   as a percentage change over that window.
//! - Seasonality: per calendar month index, only when all 12 months have data.
//! - Band: `1.96 * std_dev * sqrt(i / 7)`, widening with the horizon.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use depotiq_core::stats::{linear_regression, mean, std_dev};
use depotiq_core::{ProductId, ProductSalesHistory, SalesPoint};

pub const DEFAULT_DAYS_AHEAD: u32 = 30;
pub const DEFAULT_LEAD_TIME_DAYS: u32 = 7;

/// Longest horizon accepted at the engine boundary (ten years).
pub const MAX_DAYS_AHEAD: u32 = 3650;

/// Number of most recent days the trend is fitted on.
pub const TREND_WINDOW_DAYS: usize = 30;

/// Percent change (either direction) beyond which a trend stops being "stable".
pub const TREND_THRESHOLD_PERCENT: f64 = 5.0;

const CONFIDENCE_Z: f64 = 1.96;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Growing,
    Stable,
    Declining,
}

/// One forecast day. Invariant: `lower <= predicted <= upper`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted: i64,
    pub lower: i64,
    pub upper: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub product_id: ProductId,
    pub current_stock: i64,
    pub avg_daily_sales: f64,
    pub forecast: Vec<ForecastPoint>,
    pub trend: Trend,
    pub trend_percent: f64,
    /// Index 0 is January.
    pub seasonality_index: [f64; 12],
    pub days_until_stockout: Option<u32>,
    pub recommended_reorder_date: Option<NaiveDate>,
}

/// Per-call forecasting knobs.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastParams {
    /// The day the forecast is made on; day 1 of the horizon is the day after.
    pub as_of: NaiveDate,
    pub days_ahead: u32,
    pub lead_time_days: u32,
}

impl ForecastParams {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            days_ahead: DEFAULT_DAYS_AHEAD,
            lead_time_days: DEFAULT_LEAD_TIME_DAYS,
        }
    }

    pub fn with_days_ahead(mut self, days_ahead: u32) -> Self {
        self.days_ahead = days_ahead;
        self
    }

    pub fn with_lead_time_days(mut self, lead_time_days: u32) -> Self {
        self.lead_time_days = lead_time_days;
        self
    }

    /// Last forecast day, or `None` when it falls outside the calendar range.
    pub fn horizon_end(&self) -> Option<NaiveDate> {
        self.as_of
            .checked_add_signed(Duration::days(i64::from(self.days_ahead)))
    }
}

/// Forecast demand for one product and project when its stock runs out.
///
/// The horizon stops early if a forecast day would fall past the last
/// representable date.
pub fn forecast_demand(
    history: &ProductSalesHistory,
    current_stock: i64,
    params: &ForecastParams,
) -> ForecastResult {
    let quantities = history.quantities();
    let avg_daily_sales = mean(&quantities);
    let (trend, trend_percent) = detect_trend(&quantities);
    let seasonality_index = seasonality_indices(&history.daily_sales);
    let spread = std_dev(&quantities);

    let mut forecast = Vec::with_capacity(params.days_ahead.min(MAX_DAYS_AHEAD) as usize);
    for i in 1..=params.days_ahead {
        let Some(date) = params.as_of.checked_add_signed(Duration::days(i64::from(i))) else {
            break;
        };
        let seasonal = seasonality_index[date.month0() as usize];
        let horizon = f64::from(i);
        let trend_factor = 1.0 + trend_percent / 100.0 * horizon / TREND_WINDOW_DAYS as f64;

        let predicted = (avg_daily_sales * seasonal * trend_factor).round().max(0.0);
        let margin = CONFIDENCE_Z * spread * (horizon / 7.0).sqrt();

        forecast.push(ForecastPoint {
            date,
            predicted: predicted as i64,
            lower: (predicted - margin).round().max(0.0) as i64,
            upper: (predicted + margin).round() as i64,
        });
    }

    let days_until_stockout = project_stockout(current_stock, &forecast);
    let recommended_reorder_date = days_until_stockout.and_then(|days| {
        if days > params.lead_time_days {
            let lead = i64::from(days - params.lead_time_days);
            params.as_of.checked_add_signed(Duration::days(lead))
        } else {
            Some(params.as_of)
        }
    });

    debug!(
        product = %history.product_id,
        days = history.len(),
        avg_daily_sales,
        ?trend,
        ?days_until_stockout,
        "demand forecast computed"
    );

    ForecastResult {
        product_id: history.product_id.clone(),
        current_stock,
        avg_daily_sales,
        forecast,
        trend,
        trend_percent,
        seasonality_index,
        days_until_stockout,
        recommended_reorder_date,
    }
}

/// Classify the trend of the last [`TREND_WINDOW_DAYS`] values.
///
/// Returns the class and the percent change implied by the fitted slope over
/// the window (`slope * n / mean * 100`).
pub fn detect_trend(quantities: &[f64]) -> (Trend, f64) {
    let window = &quantities[quantities.len().saturating_sub(TREND_WINDOW_DAYS)..];
    let avg = mean(window);
    if avg == 0.0 {
        return (Trend::Stable, 0.0);
    }

    let (slope, _) = linear_regression(window);
    let percent = slope * window.len() as f64 / avg * 100.0;

    let trend = if percent > TREND_THRESHOLD_PERCENT {
        Trend::Growing
    } else if percent < -TREND_THRESHOLD_PERCENT {
        Trend::Declining
    } else {
        Trend::Stable
    };
    (trend, percent)
}

/// Per-month demand index normalised around 1.0.
///
/// Every month falls back to 1.0 unless all twelve calendar months appear in
/// the history.
pub fn seasonality_indices(points: &[SalesPoint]) -> [f64; 12] {
    let mut sums = [0.0f64; 12];
    let mut counts = [0usize; 12];
    for p in points {
        let m = p.date.month0() as usize;
        sums[m] += f64::from(p.quantity);
        counts[m] += 1;
    }

    if counts.iter().any(|&c| c == 0) {
        return [1.0; 12];
    }

    let mut monthly = [0.0f64; 12];
    for m in 0..12 {
        monthly[m] = sums[m] / counts[m] as f64;
    }

    let overall = mean(&monthly);
    if overall == 0.0 {
        return [1.0; 12];
    }
    monthly.map(|avg| avg / overall)
}

fn project_stockout(current_stock: i64, forecast: &[ForecastPoint]) -> Option<u32> {
    let mut remaining = current_stock;
    for (i, point) in forecast.iter().enumerate() {
        remaining -= point.predicted;
        if remaining <= 0 {
            return Some(i as u32 + 1);
        }
    }
    None
}
