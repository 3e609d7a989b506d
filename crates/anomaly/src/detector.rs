use tracing::debug;

use depotiq_core::stats::{mean, std_dev};
use depotiq_core::{DomainError, DomainResult, ProductSalesHistory};

use crate::alert::{AlertType, AnomalyAlert, Severity};

pub const DEFAULT_SENSITIVITY: f64 = 2.0;

/// Shorter histories produce no alerts at all.
pub const MIN_HISTORY_DAYS: usize = 7;

/// Only the most recent days are re-examined against the global baseline.
pub const RECENT_WINDOW_DAYS: usize = 7;

/// |z| above this escalates spikes and drops from medium to high.
const HIGH_SEVERITY_Z: f64 = 3.0;

/// Zero-sales checks only apply to products that normally sell more than this per day.
const ACTIVE_PRODUCT_MEAN: f64 = 1.0;
const ZERO_SALES_MIN_DAYS: usize = 3;
const ZERO_SALES_CRITICAL_DAYS: usize = 5;

/// Deterministic anomaly detection over one product's daily sales.
///
/// Model:
/// - Baseline mean/std-dev (population) over the full history.
/// - Each of the last [`RECENT_WINDOW_DAYS`] days is scored `z = (value - mean) / std`
///   (0 when std is 0).
/// - `z > sensitivity` is a spike; `z < -sensitivity` is a drop (only if the mean is positive).
/// - Three or more zero days in the window of a normally-active product raise
///   a zero-sales alert; five or more make it critical.
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    sensitivity: f64,
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl AnomalyDetector {
    pub fn new() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }

    pub fn with_sensitivity(mut self, sensitivity: f64) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    pub fn validate(&self) -> DomainResult<()> {
        if !(self.sensitivity.is_finite() && self.sensitivity > 0.0) {
            return Err(DomainError::validation("sensitivity must be a finite positive number"));
        }
        Ok(())
    }

    /// Scan `history` and return every alert found (possibly several per day).
    pub fn detect(&self, history: &ProductSalesHistory) -> DomainResult<Vec<AnomalyAlert>> {
        self.validate()?;

        if history.len() < MIN_HISTORY_DAYS {
            debug!(
                product = %history.product_id,
                days = history.len(),
                "history too short for anomaly detection"
            );
            return Ok(Vec::new());
        }

        let quantities = history.quantities();
        let mean = mean(&quantities);
        let std = std_dev(&quantities);

        let start = history.len().saturating_sub(RECENT_WINDOW_DAYS);
        let recent = &history.daily_sales[start..];

        let mut alerts = Vec::new();
        for point in recent {
            let value = f64::from(point.quantity);
            let z = if std > 0.0 { (value - mean) / std } else { 0.0 };

            if z > self.sensitivity {
                let severity = if z > HIGH_SEVERITY_Z { Severity::High } else { Severity::Medium };
                alerts.push(AnomalyAlert::new(
                    &history.product_id,
                    AlertType::Spike,
                    severity,
                    point.date,
                    mean,
                    value,
                    z,
                ));
            } else if z < -self.sensitivity && mean > 0.0 {
                let severity = if z < -HIGH_SEVERITY_Z { Severity::High } else { Severity::Medium };
                alerts.push(AnomalyAlert::new(
                    &history.product_id,
                    AlertType::Drop,
                    severity,
                    point.date,
                    mean,
                    value,
                    z,
                ));
            }
        }

        let zero_days = recent.iter().filter(|p| p.quantity == 0).count();
        if mean > ACTIVE_PRODUCT_MEAN && zero_days >= ZERO_SALES_MIN_DAYS {
            let severity = if zero_days >= ZERO_SALES_CRITICAL_DAYS {
                Severity::Critical
            } else {
                Severity::High
            };
            let recent_mean =
                recent.iter().map(|p| f64::from(p.quantity)).sum::<f64>() / recent.len() as f64;
            let deviation = if std > 0.0 { (recent_mean - mean) / std } else { 0.0 };
            // `recent` is non-empty: history.len() >= MIN_HISTORY_DAYS.
            let date = recent[recent.len() - 1].date;
            alerts.push(AnomalyAlert::new(
                &history.product_id,
                AlertType::ZeroSales,
                severity,
                date,
                mean,
                recent_mean,
                deviation,
            ));
        }

        debug!(
            product = %history.product_id,
            mean,
            std,
            alerts = alerts.len(),
            "anomaly scan finished"
        );
        Ok(alerts)
    }
}

/// Convenience wrapper: `AnomalyDetector::new().with_sensitivity(sensitivity).detect(history)`.
pub fn detect_anomalies(
    history: &ProductSalesHistory,
    sensitivity: f64,
) -> DomainResult<Vec<AnomalyAlert>> {
    AnomalyDetector::new().with_sensitivity(sensitivity).detect(history)
}
