use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use depotiq_core::ProductId;

/// Namespace for alert ids (UUIDv5).
const ALERT_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2a7e_94d3_4b0a_8e55_d2c1_7a3f_0b19);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Spike,
    Drop,
    ZeroSales,
    UnusualPattern,
}

impl AlertType {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertType::Spike => "spike",
            AlertType::Drop => "drop",
            AlertType::ZeroSales => "zero_sales",
            AlertType::UnusualPattern => "unusual_pattern",
        }
    }

    pub fn possible_causes(self) -> &'static [&'static str] {
        match self {
            AlertType::Spike => &[
                "Promotion or marketing campaign",
                "Seasonal demand peak",
                "Bulk order from a single customer",
                "Data entry error",
            ],
            AlertType::Drop => &[
                "Stock shortage or hidden listing",
                "Competitor price change",
                "Recent price increase",
                "End of season",
            ],
            AlertType::ZeroSales => &[
                "Out of stock",
                "Product delisted or hidden in the storefront",
                "Marketplace feed or sync failure",
                "Pricing error",
            ],
            AlertType::UnusualPattern => &["Irregular ordering pattern", "Data quality issue"],
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// One flagged observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyAlert {
    /// Stable for the same product, type and date across calls.
    pub id: Uuid,
    pub product_id: ProductId,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: Severity,
    pub expected_value: f64,
    pub actual_value: f64,
    /// Distance from the expected value in standard deviations.
    pub deviation: f64,
    pub date: NaiveDate,
    pub possible_causes: Vec<String>,
}

impl AnomalyAlert {
    pub(crate) fn new(
        product_id: &ProductId,
        alert_type: AlertType,
        severity: Severity,
        date: NaiveDate,
        expected_value: f64,
        actual_value: f64,
        deviation: f64,
    ) -> Self {
        Self {
            id: alert_id(product_id, alert_type, date),
            product_id: product_id.clone(),
            alert_type,
            severity,
            expected_value,
            actual_value,
            deviation,
            date,
            possible_causes: alert_type.possible_causes().iter().map(|c| c.to_string()).collect(),
        }
    }
}

fn alert_id(product_id: &ProductId, alert_type: AlertType, date: NaiveDate) -> Uuid {
    let key = format!("{}|{}|{}", product_id, alert_type.as_str(), date);
    Uuid::new_v5(&ALERT_NAMESPACE, key.as_bytes())
}
