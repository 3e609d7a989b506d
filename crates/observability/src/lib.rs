//! Process-wide logging setup for binaries embedding the engine.
//!
//! Library crates only emit `tracing` events; installing a subscriber is the
//! host process's job.

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize tracing with the format chosen by `DEPOTIQ_LOG_FORMAT`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::from_env());
}
