//! Safety stock, reorder point and stock-status classification.

use serde::{Deserialize, Serialize};
use tracing::debug;

use depotiq_core::ProductId;
use depotiq_core::stats::{mean, std_dev, z_score};

use crate::demand::DEFAULT_LEAD_TIME_DAYS;

pub const DEFAULT_SERVICE_LEVEL: f64 = 0.95;

/// Reported as `days_of_stock` when the product does not sell at all.
pub const UNBOUNDED_DAYS_OF_STOCK: i64 = 999;

/// Days of average demand a reorder covers (on top of safety stock).
pub const REORDER_COVER_DAYS: f64 = 30.0;

/// Stock above `OVERSTOCK_FACTOR * reorder_quantity` is overstock.
pub const OVERSTOCK_FACTOR: i64 = 3;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Ok,
    ReorderNow,
    Critical,
    Overstock,
}

impl StockStatus {
    /// Lower is more urgent.
    pub fn urgency_rank(self) -> u8 {
        match self {
            StockStatus::Critical => 0,
            StockStatus::ReorderNow => 1,
            StockStatus::Ok => 2,
            StockStatus::Overstock => 3,
        }
    }
}

/// Replenishment plan for one product.
///
/// Invariant: `reorder_point >= safety_stock >= 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderPoint {
    pub product_id: ProductId,
    pub current_stock: i64,
    pub avg_daily_sales: f64,
    pub lead_time_days: u32,
    pub safety_stock: i64,
    pub reorder_point: i64,
    pub reorder_quantity: i64,
    pub status: StockStatus,
    pub days_of_stock: i64,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderParams {
    pub lead_time_days: u32,
    /// Looked up in the z-score table (0.90, 0.95, 0.99).
    pub service_level: f64,
}

impl Default for ReorderParams {
    fn default() -> Self {
        Self {
            lead_time_days: DEFAULT_LEAD_TIME_DAYS,
            service_level: DEFAULT_SERVICE_LEVEL,
        }
    }
}

/// One product's input to [`calculate_reorder_points`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderInput {
    pub product_id: ProductId,
    pub current_stock: i64,
    pub sales_history: Vec<f64>,
}

pub fn calculate_reorder_point(
    product_id: ProductId,
    stock: i64,
    sales_history: &[f64],
    params: &ReorderParams,
) -> ReorderPoint {
    let avg_daily_sales = mean(sales_history);
    let lead_time = f64::from(params.lead_time_days);

    let safety_stock =
        (z_score(params.service_level) * std_dev(sales_history) * lead_time.sqrt()).ceil() as i64;
    let reorder_point = (safety_stock as f64 + avg_daily_sales * lead_time).ceil() as i64;
    // Simplified order quantity: a month of demand plus the buffer.
    let reorder_quantity =
        (avg_daily_sales * REORDER_COVER_DAYS + safety_stock as f64).ceil() as i64;

    let days_of_stock = if avg_daily_sales == 0.0 {
        UNBOUNDED_DAYS_OF_STOCK
    } else {
        (stock as f64 / avg_daily_sales).round() as i64
    };

    // Order matters: critical wins over every other condition.
    let status = if stock <= safety_stock {
        StockStatus::Critical
    } else if stock <= reorder_point {
        StockStatus::ReorderNow
    } else if stock > OVERSTOCK_FACTOR * reorder_quantity {
        StockStatus::Overstock
    } else {
        StockStatus::Ok
    };

    ReorderPoint {
        product_id,
        current_stock: stock,
        avg_daily_sales,
        lead_time_days: params.lead_time_days,
        safety_stock,
        reorder_point,
        reorder_quantity,
        status,
        days_of_stock,
    }
}

/// Bulk variant: one plan per input, most urgent first.
///
/// Products with the same status keep their input order.
pub fn calculate_reorder_points(
    inputs: &[ReorderInput],
    params: &ReorderParams,
) -> Vec<ReorderPoint> {
    let mut plans: Vec<ReorderPoint> = inputs
        .iter()
        .map(|i| {
            calculate_reorder_point(i.product_id.clone(), i.current_stock, &i.sales_history, params)
        })
        .collect();
    plans.sort_by_key(|p| p.status.urgency_rank());

    debug!(
        products = plans.len(),
        critical = plans.iter().filter(|p| p.status == StockStatus::Critical).count(),
        "reorder points computed"
    );
    plans
}
