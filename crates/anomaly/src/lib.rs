//! `depotiq-anomaly`
//!
//! Z-score based flagging of unusual daily sales (spikes, drops, runs of
//! zero-sales days). Alerts are insights for humans to look at; this crate
//! never acts on them and keeps no state between calls.

pub mod alert;
pub mod detector;

pub use alert::{AlertType, AnomalyAlert, Severity};
pub use detector::{
    AnomalyDetector, DEFAULT_SENSITIVITY, MIN_HISTORY_DAYS, RECENT_WINDOW_DAYS, detect_anomalies,
};
