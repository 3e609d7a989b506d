//! JSON request/response envelopes.
//!
//! A request names its operation in an `"operation"` field; every other field
//! is that operation's payload. Optional parameters fall back to
//! [`EngineConfig`](crate::EngineConfig).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use depotiq_anomaly::AnomalyAlert;
use depotiq_classification::{AbcXyzThresholds, HotColdZone, ProductRevenue, ProductTurnover};
use depotiq_core::{GeoPoint, ProductId, ProductSalesHistory};
use depotiq_forecasting::{ForecastResult, ReorderInput, ReorderPoint};
use depotiq_fulfillment::{
    Facility, PickOrder, ShipFromStoreResult, SourcingOrder, WavePickingBatch,
};

use crate::engine::AbcXyzReport;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Request {
    ForecastDemand {
        history: ProductSalesHistory,
        current_stock: i64,
        #[serde(default)]
        days_ahead: Option<u32>,
        #[serde(default)]
        lead_time_days: Option<u32>,
        /// Defaults to today (UTC).
        #[serde(default)]
        as_of: Option<NaiveDate>,
    },
    CalculateReorderPoint {
        product_id: ProductId,
        current_stock: i64,
        sales_history: Vec<f64>,
        #[serde(default)]
        lead_time_days: Option<u32>,
        #[serde(default)]
        service_level: Option<f64>,
    },
    CalculateReorderPoints {
        products: Vec<ReorderInput>,
        #[serde(default)]
        lead_time_days: Option<u32>,
        #[serde(default)]
        service_level: Option<f64>,
    },
    ClassifyAbcXyz {
        products: Vec<ProductRevenue>,
        #[serde(default)]
        thresholds: Option<AbcXyzThresholds>,
    },
    DetectAnomalies {
        history: ProductSalesHistory,
        #[serde(default)]
        sensitivity: Option<f64>,
    },
    ClassifyHotColdZones {
        products: Vec<ProductTurnover>,
    },
    CreateWavePickingBatches {
        orders: Vec<PickOrder>,
        #[serde(default)]
        max_orders_per_batch: Option<usize>,
        #[serde(default)]
        max_items_per_batch: Option<u64>,
    },
    SelectShipmentSource {
        order: SourcingOrder,
        customer: GeoPoint,
        candidates: Vec<Facility>,
    },
}

impl Request {
    pub fn operation(&self) -> &'static str {
        match self {
            Request::ForecastDemand { .. } => "forecast_demand",
            Request::CalculateReorderPoint { .. } => "calculate_reorder_point",
            Request::CalculateReorderPoints { .. } => "calculate_reorder_points",
            Request::ClassifyAbcXyz { .. } => "classify_abc_xyz",
            Request::DetectAnomalies { .. } => "detect_anomalies",
            Request::ClassifyHotColdZones { .. } => "classify_hot_cold_zones",
            Request::CreateWavePickingBatches { .. } => "create_wave_picking_batches",
            Request::SelectShipmentSource { .. } => "select_shipment_source",
        }
    }
}

/// Operation output, serialized without an envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Forecast(ForecastResult),
    ReorderPoint(ReorderPoint),
    ReorderPoints(Vec<ReorderPoint>),
    AbcXyz(AbcXyzReport),
    Anomalies(Vec<AnomalyAlert>),
    Zones(Vec<HotColdZone>),
    Waves(Vec<WavePickingBatch>),
    /// `null` when there were no candidates.
    ShipmentSource(Option<ShipFromStoreResult>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_tag_selects_variant() {
        let payload = r#"{
            "operation": "detect_anomalies",
            "history": {"product_id": "SKU-1", "daily_sales": []}
        }"#;
        let req: Request = serde_json::from_str(payload).unwrap();
        assert_eq!(req.operation(), "detect_anomalies");
        assert!(matches!(req, Request::DetectAnomalies { sensitivity: None, .. }));
    }

    #[test]
    fn unknown_operation_is_a_payload_error() {
        let err =
            serde_json::from_str::<Request>(r#"{"operation": "launch_rockets"}"#).unwrap_err();
        assert!(err.to_string().contains("launch_rockets"));
    }

    #[test]
    fn empty_shipment_source_serializes_as_null() {
        let json = serde_json::to_string(&Response::ShipmentSource(None)).unwrap();
        assert_eq!(json, "null");
    }
}
