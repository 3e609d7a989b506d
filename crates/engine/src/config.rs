//! Engine defaults and their environment overrides.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use depotiq_anomaly::DEFAULT_SENSITIVITY;
use depotiq_classification::AbcXyzThresholds;
use depotiq_forecasting::{
    DEFAULT_DAYS_AHEAD, DEFAULT_LEAD_TIME_DAYS, DEFAULT_SERVICE_LEVEL, MAX_DAYS_AHEAD,
};
use depotiq_fulfillment::{
    DEFAULT_COST_PER_KM, DEFAULT_MAX_ITEMS_PER_BATCH, DEFAULT_MAX_ORDERS_PER_BATCH,
};

use crate::error::EngineError;

/// Defaults applied when a request leaves a parameter out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub forecast_days_ahead: u32,
    pub lead_time_days: u32,
    pub service_level: f64,
    pub anomaly_sensitivity: f64,
    pub max_orders_per_batch: usize,
    pub max_items_per_batch: u64,
    pub shipping_cost_per_km: f64,
    pub abc_xyz: AbcXyzThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            forecast_days_ahead: DEFAULT_DAYS_AHEAD,
            lead_time_days: DEFAULT_LEAD_TIME_DAYS,
            service_level: DEFAULT_SERVICE_LEVEL,
            anomaly_sensitivity: DEFAULT_SENSITIVITY,
            max_orders_per_batch: DEFAULT_MAX_ORDERS_PER_BATCH,
            max_items_per_batch: DEFAULT_MAX_ITEMS_PER_BATCH,
            shipping_cost_per_km: DEFAULT_COST_PER_KM,
            abc_xyz: AbcXyzThresholds::default(),
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with `DEPOTIQ_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values from `lookup` (keyed by environment variable name).
    ///
    /// Unparsable values are logged and ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        overlay(&lookup, "DEPOTIQ_FORECAST_DAYS_AHEAD", &mut self.forecast_days_ahead);
        overlay(&lookup, "DEPOTIQ_LEAD_TIME_DAYS", &mut self.lead_time_days);
        overlay(&lookup, "DEPOTIQ_SERVICE_LEVEL", &mut self.service_level);
        overlay(&lookup, "DEPOTIQ_ANOMALY_SENSITIVITY", &mut self.anomaly_sensitivity);
        overlay(&lookup, "DEPOTIQ_MAX_ORDERS_PER_BATCH", &mut self.max_orders_per_batch);
        overlay(&lookup, "DEPOTIQ_MAX_ITEMS_PER_BATCH", &mut self.max_items_per_batch);
        overlay(&lookup, "DEPOTIQ_SHIPPING_COST_PER_KM", &mut self.shipping_cost_per_km);
        overlay(&lookup, "DEPOTIQ_ABC_A_BOUNDARY", &mut self.abc_xyz.a_boundary);
        overlay(&lookup, "DEPOTIQ_ABC_B_BOUNDARY", &mut self.abc_xyz.b_boundary);
        overlay(&lookup, "DEPOTIQ_XYZ_X_BOUNDARY", &mut self.abc_xyz.x_boundary);
        overlay(&lookup, "DEPOTIQ_XYZ_Y_BOUNDARY", &mut self.abc_xyz.y_boundary);
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.forecast_days_ahead > MAX_DAYS_AHEAD {
            return Err(EngineError::config(format!(
                "forecast_days_ahead must be at most {MAX_DAYS_AHEAD}"
            )));
        }
        if !(self.service_level > 0.0 && self.service_level < 1.0) {
            return Err(EngineError::config("service_level must be in (0, 1)"));
        }
        if !(self.anomaly_sensitivity.is_finite() && self.anomaly_sensitivity > 0.0) {
            return Err(EngineError::config("anomaly_sensitivity must be a finite positive number"));
        }
        if self.max_orders_per_batch == 0 || self.max_items_per_batch == 0 {
            return Err(EngineError::config("batch caps must be >= 1"));
        }
        if !(self.shipping_cost_per_km.is_finite() && self.shipping_cost_per_km >= 0.0) {
            return Err(EngineError::config("shipping_cost_per_km must be finite and non-negative"));
        }
        self.abc_xyz
            .validate()
            .map_err(|e| EngineError::config(format!("abc_xyz: {e}")))
    }
}

fn overlay<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut T) {
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(v) => *slot = v,
        Err(_) => warn!(key, value = %raw, "ignoring unparsable configuration value"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.forecast_days_ahead, 30);
        assert_eq!(cfg.lead_time_days, 7);
        assert_eq!(cfg.service_level, 0.95);
        assert_eq!(cfg.anomaly_sensitivity, 2.0);
        assert_eq!(cfg.max_orders_per_batch, 10);
        assert_eq!(cfg.max_items_per_batch, 50);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn overrides_apply_and_bad_values_are_ignored() {
        let cfg = EngineConfig::default().with_overrides(lookup_from(&[
            ("DEPOTIQ_LEAD_TIME_DAYS", "14"),
            ("DEPOTIQ_SERVICE_LEVEL", " 0.99 "),
            ("DEPOTIQ_MAX_ITEMS_PER_BATCH", "lots"),
            ("DEPOTIQ_ABC_A_BOUNDARY", "70"),
        ]));

        assert_eq!(cfg.lead_time_days, 14);
        assert_eq!(cfg.service_level, 0.99);
        assert_eq!(cfg.max_items_per_batch, 50);
        assert_eq!(cfg.abc_xyz.a_boundary, 70.0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = EngineConfig { service_level: 1.5, ..EngineConfig::default() };
        assert!(matches!(cfg.validate(), Err(EngineError::Config(_))));

        let mut cfg = EngineConfig::default();
        cfg.abc_xyz.x_boundary = 0.5;
        assert!(cfg.validate().is_err());

        let cfg = EngineConfig::default()
            .with_overrides(lookup_from(&[("DEPOTIQ_FORECAST_DAYS_AHEAD", "100000")]));
        assert!(matches!(cfg.validate(), Err(EngineError::Config(_))));
    }

    #[test]
    fn partial_json_config_keeps_defaults() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"lead_time_days": 3}"#).unwrap();
        assert_eq!(cfg.lead_time_days, 3);
        assert_eq!(cfg.forecast_days_ahead, 30);
    }
}
