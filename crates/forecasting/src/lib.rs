//! Demand forecasting and replenishment planning.
//!
//! Both components are deterministic transforms of a product's sales series
//! and a stock snapshot. Nothing here performs IO or reads the clock: the
//! "today" a forecast is anchored on is passed in explicitly.

pub mod demand;
pub mod reorder;

pub use demand::{
    DEFAULT_DAYS_AHEAD, DEFAULT_LEAD_TIME_DAYS, ForecastParams, ForecastPoint, ForecastResult,
    MAX_DAYS_AHEAD, Trend, detect_trend, forecast_demand, seasonality_indices,
};
pub use reorder::{
    DEFAULT_SERVICE_LEVEL, ReorderInput, ReorderParams, ReorderPoint, StockStatus,
    calculate_reorder_point, calculate_reorder_points,
};
