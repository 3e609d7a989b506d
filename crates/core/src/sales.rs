//! Sales-series records consumed by the analytical components.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::id::ProductId;

/// One product's sales on one day, as produced from order records upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub product_id: ProductId,
    pub quantity: u32,
    pub revenue: f64,
}

/// A single point of a product's daily series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesPoint {
    pub date: NaiveDate,
    pub quantity: u32,
    #[serde(default)]
    pub revenue: f64,
}

/// Ordered daily series for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSalesHistory {
    pub product_id: ProductId,
    #[serde(default)]
    pub product_name: String,
    pub daily_sales: Vec<SalesPoint>,
}

impl ProductSalesHistory {
    pub fn new(
        product_id: ProductId,
        product_name: impl Into<String>,
        daily_sales: Vec<SalesPoint>,
    ) -> Self {
        Self {
            product_id,
            product_name: product_name.into(),
            daily_sales,
        }
    }

    /// Build a history from flat fact rows, keeping only `product_id`'s rows
    /// and ordering them by date.
    pub fn from_daily_sales(
        product_id: ProductId,
        product_name: impl Into<String>,
        rows: &[DailySales],
    ) -> Self {
        let mut daily_sales: Vec<SalesPoint> = rows
            .iter()
            .filter(|r| r.product_id == product_id)
            .map(|r| SalesPoint {
                date: r.date,
                quantity: r.quantity,
                revenue: r.revenue,
            })
            .collect();
        daily_sales.sort_by_key(|p| p.date);
        Self::new(product_id, product_name, daily_sales)
    }

    /// Daily quantities as floats, in series order.
    pub fn quantities(&self) -> Vec<f64> {
        self.daily_sales.iter().map(|p| f64::from(p.quantity)).collect()
    }

    pub fn total_revenue(&self) -> f64 {
        self.daily_sales.iter().map(|p| p.revenue).sum()
    }

    pub fn len(&self) -> usize {
        self.daily_sales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.daily_sales.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn from_daily_sales_filters_and_orders_rows() {
        let row = |d, product: &str, quantity: u32| DailySales {
            date: day(d),
            product_id: product.into(),
            quantity,
            revenue: f64::from(quantity) * 10.0,
        };
        let rows = vec![row(3, "P1", 3), row(1, "P1", 1), row(2, "P2", 9)];

        let history = ProductSalesHistory::from_daily_sales("P1".into(), "Widget", &rows);

        assert_eq!(history.len(), 2);
        assert_eq!(history.quantities(), vec![1.0, 3.0]);
        assert_eq!(history.total_revenue(), 40.0);
    }
}
