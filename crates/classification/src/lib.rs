//! Cohort-level product classification.
//!
//! Classes are **relative** to the cohort passed in: the same product can land
//! in a different class when analysed together with a different set of
//! products. Both passes carry running totals and are computed in a single
//! ordered sweep over the cohort.

pub mod abc_xyz;
pub mod zones;

pub use abc_xyz::{
    AbcClass, AbcXyzAnalysis, AbcXyzMatrix, AbcXyzResult, AbcXyzSummary, AbcXyzThresholds,
    ClassSummary, MatrixCell, OptimizationSuggestion, ProductRevenue, StrategyProfile,
    SuggestionPriority, XyzClass, classify_abc_xyz, optimization_suggestions, strategy_for,
};
pub use zones::{HotColdZone, ProductTurnover, ZoneProduct, ZoneType, classify_hot_cold_zones};
