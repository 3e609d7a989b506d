//! Boundary checks on caller payloads.
//!
//! The analytical crates assume well-formed input (non-blank ids, finite
//! numbers, stock that is not negative). Everything arriving through the
//! engine is checked here first.

use depotiq_classification::{ProductRevenue, ProductTurnover};
use depotiq_core::{DomainError, DomainResult, GeoPoint, ProductId, ProductSalesHistory};
use depotiq_forecasting::{ForecastParams, MAX_DAYS_AHEAD, ReorderInput};
use depotiq_fulfillment::{Facility, PickOrder, SourcingOrder};

pub(crate) fn product_id(id: &ProductId) -> DomainResult<()> {
    if id.is_blank() {
        return Err(DomainError::invalid_id("product id must not be blank"));
    }
    Ok(())
}

pub(crate) fn stock(product: &ProductId, stock: i64) -> DomainResult<()> {
    if stock < 0 {
        return Err(DomainError::validation(format!(
            "{product}: stock must not be negative, got {stock}"
        )));
    }
    Ok(())
}

pub(crate) fn finite_non_negative(what: &str, value: f64) -> DomainResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::validation(format!(
            "{what} must be finite and non-negative, got {value}"
        )));
    }
    Ok(())
}

pub(crate) fn service_level(value: f64) -> DomainResult<()> {
    if !(value > 0.0 && value < 1.0) {
        return Err(DomainError::validation(format!(
            "service_level must be in (0, 1), got {value}"
        )));
    }
    Ok(())
}

pub(crate) fn forecast_params(params: &ForecastParams) -> DomainResult<()> {
    if params.days_ahead > MAX_DAYS_AHEAD {
        return Err(DomainError::validation(format!(
            "days_ahead must be at most {MAX_DAYS_AHEAD}, got {}",
            params.days_ahead
        )));
    }
    if params.horizon_end().is_none() {
        return Err(DomainError::validation(format!(
            "forecast horizon starting {} runs past the supported date range",
            params.as_of
        )));
    }
    Ok(())
}

/// One point per day, oldest first.
pub(crate) fn history(history: &ProductSalesHistory) -> DomainResult<()> {
    product_id(&history.product_id)?;
    for point in &history.daily_sales {
        finite_non_negative("revenue", point.revenue)?;
    }
    if let Some(pair) = history.daily_sales.windows(2).find(|w| w[0].date >= w[1].date) {
        return Err(DomainError::invariant(format!(
            "{}: daily sales must be strictly ascending by date ({} then {})",
            history.product_id, pair[0].date, pair[1].date
        )));
    }
    Ok(())
}

pub(crate) fn sales_series(product: &ProductId, series: &[f64]) -> DomainResult<()> {
    if let Some(bad) = series.iter().find(|v| !v.is_finite() || **v < 0.0) {
        return Err(DomainError::validation(format!(
            "{product}: sales history must be finite and non-negative, got {bad}"
        )));
    }
    Ok(())
}

pub(crate) fn reorder_input(input: &ReorderInput) -> DomainResult<()> {
    product_id(&input.product_id)?;
    stock(&input.product_id, input.current_stock)?;
    sales_series(&input.product_id, &input.sales_history)
}

pub(crate) fn product_revenue(product: &ProductRevenue) -> DomainResult<()> {
    product_id(&product.product_id)?;
    finite_non_negative("revenue", product.revenue)?;
    sales_series(&product.product_id, &product.sales_history)
}

pub(crate) fn turnover(product: &ProductTurnover) -> DomainResult<()> {
    product_id(&product.product_id)?;
    finite_non_negative("turnover_rate", product.turnover_rate)
}

pub(crate) fn pick_order(order: &PickOrder) -> DomainResult<()> {
    if order.order_id.is_blank() {
        return Err(DomainError::invalid_id("order id must not be blank"));
    }
    order.lines.iter().try_for_each(|line| product_id(&line.product_id))
}

pub(crate) fn location(what: &str, point: &GeoPoint) -> DomainResult<()> {
    let lat_ok = point.lat.is_finite() && (-90.0..=90.0).contains(&point.lat);
    let lng_ok = point.lng.is_finite() && (-180.0..=180.0).contains(&point.lng);
    if !(lat_ok && lng_ok) {
        return Err(DomainError::validation(format!(
            "{what}: coordinates out of range ({}, {})",
            point.lat, point.lng
        )));
    }
    Ok(())
}

pub(crate) fn sourcing_order(order: &SourcingOrder) -> DomainResult<()> {
    if order.order_id.is_blank() {
        return Err(DomainError::invalid_id("order id must not be blank"));
    }
    order.lines.iter().try_for_each(|line| product_id(&line.product_id))
}

pub(crate) fn facility(facility: &Facility) -> DomainResult<()> {
    if facility.id.is_blank() {
        return Err(DomainError::invalid_id("facility id must not be blank"));
    }
    location(facility.id.as_str(), &facility.location)?;
    for (product, on_hand) in &facility.stock {
        stock(product, *on_hand)?;
    }
    if let Some(rate) = facility.cost_per_km {
        finite_non_negative("cost_per_km", rate)?;
    }
    Ok(())
}
