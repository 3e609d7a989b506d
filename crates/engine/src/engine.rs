use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, info, instrument};

use depotiq_anomaly::{AnomalyAlert, AnomalyDetector};
use depotiq_classification::{
    AbcXyzAnalysis, AbcXyzThresholds, HotColdZone, OptimizationSuggestion, ProductRevenue,
    ProductTurnover, classify_abc_xyz, classify_hot_cold_zones, optimization_suggestions,
};
use depotiq_core::{GeoPoint, ProductId, ProductSalesHistory};
use depotiq_forecasting::{
    ForecastParams, ForecastResult, ReorderInput, ReorderParams, ReorderPoint,
    calculate_reorder_point, calculate_reorder_points, forecast_demand,
};
use depotiq_fulfillment::{
    Facility, PickOrder, ShipFromStoreResult, SourcingOrder, SourcingParams, WavePickingBatch,
    WavePlanner, select_shipment_source,
};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::request::{Request, Response};
use crate::validate;

/// ABC-XYZ classification together with the suggestions derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcXyzReport {
    #[serde(flatten)]
    pub analysis: AbcXyzAnalysis,
    pub suggestions: Vec<OptimizationSuggestion>,
}

/// Stateless facade over the analytics crates.
///
/// Each method validates its input, applies configured defaults and calls the
/// matching pure function. An `Engine` can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Forecast parameters anchored on `as_of`, horizon and lead time from config.
    pub fn forecast_params(&self, as_of: NaiveDate) -> ForecastParams {
        ForecastParams::new(as_of)
            .with_days_ahead(self.config.forecast_days_ahead)
            .with_lead_time_days(self.config.lead_time_days)
    }

    pub fn reorder_params(&self) -> ReorderParams {
        ReorderParams {
            lead_time_days: self.config.lead_time_days,
            service_level: self.config.service_level,
        }
    }

    pub fn forecast_demand(
        &self,
        history: &ProductSalesHistory,
        current_stock: i64,
        params: &ForecastParams,
    ) -> Result<ForecastResult, EngineError> {
        validate::history(history)?;
        validate::stock(&history.product_id, current_stock)?;
        validate::forecast_params(params)?;
        Ok(forecast_demand(history, current_stock, params))
    }

    pub fn calculate_reorder_point(
        &self,
        product_id: ProductId,
        current_stock: i64,
        sales_history: &[f64],
        params: &ReorderParams,
    ) -> Result<ReorderPoint, EngineError> {
        validate::product_id(&product_id)?;
        validate::stock(&product_id, current_stock)?;
        validate::sales_series(&product_id, sales_history)?;
        validate::service_level(params.service_level)?;
        Ok(calculate_reorder_point(product_id, current_stock, sales_history, params))
    }

    /// Reorder points for many products, most urgent first.
    pub fn calculate_reorder_points(
        &self,
        products: &[ReorderInput],
        params: &ReorderParams,
    ) -> Result<Vec<ReorderPoint>, EngineError> {
        products.iter().try_for_each(validate::reorder_input)?;
        validate::service_level(params.service_level)?;
        Ok(calculate_reorder_points(products, params))
    }

    pub fn classify_abc_xyz(
        &self,
        products: &[ProductRevenue],
        thresholds: Option<&AbcXyzThresholds>,
    ) -> Result<AbcXyzReport, EngineError> {
        let thresholds = thresholds.unwrap_or(&self.config.abc_xyz);
        thresholds.validate()?;
        products.iter().try_for_each(validate::product_revenue)?;

        let analysis = classify_abc_xyz(products, thresholds);
        let suggestions = optimization_suggestions(&analysis);
        Ok(AbcXyzReport { analysis, suggestions })
    }

    pub fn detect_anomalies(
        &self,
        history: &ProductSalesHistory,
        sensitivity: Option<f64>,
    ) -> Result<Vec<AnomalyAlert>, EngineError> {
        validate::history(history)?;
        let sensitivity = sensitivity.unwrap_or(self.config.anomaly_sensitivity);
        let detector = AnomalyDetector::new().with_sensitivity(sensitivity);
        Ok(detector.detect(history)?)
    }

    pub fn classify_hot_cold_zones(
        &self,
        products: &[ProductTurnover],
    ) -> Result<Vec<HotColdZone>, EngineError> {
        products.iter().try_for_each(validate::turnover)?;
        Ok(classify_hot_cold_zones(products))
    }

    /// Configured caps unless overridden per call.
    pub fn wave_planner(&self, max_orders: Option<usize>, max_items: Option<u64>) -> WavePlanner {
        WavePlanner::new()
            .with_max_orders(max_orders.unwrap_or(self.config.max_orders_per_batch))
            .with_max_items(max_items.unwrap_or(self.config.max_items_per_batch))
    }

    pub fn create_wave_picking_batches(
        &self,
        orders: &[PickOrder],
        planner: &WavePlanner,
    ) -> Result<Vec<WavePickingBatch>, EngineError> {
        orders.iter().try_for_each(validate::pick_order)?;
        Ok(planner.plan(orders)?)
    }

    pub fn select_shipment_source(
        &self,
        order: &SourcingOrder,
        customer: &GeoPoint,
        candidates: &[Facility],
    ) -> Result<Option<ShipFromStoreResult>, EngineError> {
        validate::sourcing_order(order)?;
        validate::location("customer", customer)?;
        candidates.iter().try_for_each(validate::facility)?;

        let params = SourcingParams {
            default_cost_per_km: self.config.shipping_cost_per_km,
        };
        Ok(select_shipment_source(order, customer, candidates, &params))
    }

    /// Run one request, filling omitted parameters from config.
    #[instrument(skip_all, fields(operation = request.operation()), err)]
    pub fn dispatch(&self, request: Request) -> Result<Response, EngineError> {
        let response = match request {
            Request::ForecastDemand {
                history,
                current_stock,
                days_ahead,
                lead_time_days,
                as_of,
            } => {
                let as_of = as_of.unwrap_or_else(|| Utc::now().date_naive());
                let mut params = self.forecast_params(as_of);
                if let Some(days) = days_ahead {
                    params = params.with_days_ahead(days);
                }
                if let Some(days) = lead_time_days {
                    params = params.with_lead_time_days(days);
                }
                Response::Forecast(self.forecast_demand(&history, current_stock, &params)?)
            }
            Request::CalculateReorderPoint {
                product_id,
                current_stock,
                sales_history,
                lead_time_days,
                service_level,
            } => {
                let params = self.reorder_overrides(lead_time_days, service_level);
                Response::ReorderPoint(self.calculate_reorder_point(
                    product_id,
                    current_stock,
                    &sales_history,
                    &params,
                )?)
            }
            Request::CalculateReorderPoints {
                products,
                lead_time_days,
                service_level,
            } => {
                let params = self.reorder_overrides(lead_time_days, service_level);
                Response::ReorderPoints(self.calculate_reorder_points(&products, &params)?)
            }
            Request::ClassifyAbcXyz { products, thresholds } => {
                Response::AbcXyz(self.classify_abc_xyz(&products, thresholds.as_ref())?)
            }
            Request::DetectAnomalies { history, sensitivity } => {
                Response::Anomalies(self.detect_anomalies(&history, sensitivity)?)
            }
            Request::ClassifyHotColdZones { products } => {
                Response::Zones(self.classify_hot_cold_zones(&products)?)
            }
            Request::CreateWavePickingBatches {
                orders,
                max_orders_per_batch,
                max_items_per_batch,
            } => {
                let planner = self.wave_planner(max_orders_per_batch, max_items_per_batch);
                Response::Waves(self.create_wave_picking_batches(&orders, &planner)?)
            }
            Request::SelectShipmentSource {
                order,
                customer,
                candidates,
            } => {
                let selection = self.select_shipment_source(&order, &customer, &candidates)?;
                Response::ShipmentSource(selection)
            }
        };
        debug!("request handled");
        Ok(response)
    }

    /// Parse a JSON request, run it, and return the JSON result.
    pub fn dispatch_json(&self, payload: &str) -> Result<JsonValue, EngineError> {
        let request: Request = serde_json::from_str(payload)?;
        info!(operation = request.operation(), "dispatching request");
        let response = self.dispatch(request)?;
        Ok(serde_json::to_value(response)?)
    }

    fn reorder_overrides(
        &self,
        lead_time_days: Option<u32>,
        service_level: Option<f64>,
    ) -> ReorderParams {
        let defaults = self.reorder_params();
        ReorderParams {
            lead_time_days: lead_time_days.unwrap_or(defaults.lead_time_days),
            service_level: service_level.unwrap_or(defaults.service_level),
        }
    }
}
