//! Ship-from-store source selection.
//!
//! Every candidate facility is scored (lower is better):
//!
//! ```text
//! score = 0.3 * distance_km + 0.3 * shipping_cost + 10 * delivery_days
//!       + 1000 if the facility cannot ship the whole order
//! ```
//!
//! The stock penalty dominates every other term, so any fully-stocked source
//! beats an under-stocked one regardless of distance.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use depotiq_core::{FacilityId, GeoPoint, OrderId, ProductId};

pub const DEFAULT_COST_PER_KM: f64 = 0.5;

const DISTANCE_WEIGHT: f64 = 0.3;
const COST_WEIGHT: f64 = 0.3;
const DAY_WEIGHT: f64 = 10.0;
const UNDERSTOCK_PENALTY: f64 = 1000.0;
const KM_PER_TRANSIT_DAY: f64 = 100.0;
const MAX_ALTERNATIVES: usize = 3;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityKind {
    Warehouse,
    Store,
}

/// A warehouse or store that could ship the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: FacilityId,
    #[serde(default)]
    pub name: String,
    pub kind: FacilityKind,
    pub location: GeoPoint,
    /// Units on hand per product.
    #[serde(default)]
    pub stock: HashMap<ProductId, i64>,
    /// Time to pick and pack before handing over to the carrier.
    pub processing_hours: u32,
    /// Overrides [`SourcingParams::default_cost_per_km`].
    #[serde(default)]
    pub cost_per_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcingOrder {
    pub order_id: OrderId,
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcingParams {
    pub default_cost_per_km: f64,
}

impl Default for SourcingParams {
    fn default() -> Self {
        Self {
            default_cost_per_km: DEFAULT_COST_PER_KM,
        }
    }
}

/// Scored candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEvaluation {
    pub facility_id: FacilityId,
    pub facility_name: String,
    pub kind: FacilityKind,
    pub distance_km: f64,
    pub fully_stocked: bool,
    pub shipping_cost: f64,
    pub processing_days: u32,
    pub delivery_days: u32,
    pub score: f64,
}

/// Why an alternative lost to the recommended source.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceReason {
    InsufficientStock,
    LongerDistance,
    HigherCost,
    LongerProcessing,
}

impl fmt::Display for SourceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SourceReason::InsufficientStock => "insufficient stock to ship the full order",
            SourceReason::LongerDistance => "longer distance to the customer",
            SourceReason::HigherCost => "higher shipping cost",
            SourceReason::LongerProcessing => "longer order processing time",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceAlternative {
    #[serde(flatten)]
    pub source: SourceEvaluation,
    pub reason: SourceReason,
    pub reason_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipFromStoreResult {
    pub order_id: OrderId,
    pub recommended_source: SourceEvaluation,
    /// Next best candidates, best first (at most three).
    pub alternatives: Vec<SourceAlternative>,
}

/// Score a single facility for `order`.
pub fn evaluate_source(
    order: &SourcingOrder,
    customer: &GeoPoint,
    facility: &Facility,
    params: &SourcingParams,
) -> SourceEvaluation {
    let distance_km = facility.location.distance_km(customer);
    let cost_per_km = facility.cost_per_km.unwrap_or(params.default_cost_per_km);
    let shipping_cost = distance_km * cost_per_km;

    let fully_stocked = required_quantities(order)
        .into_iter()
        .all(|(product_id, needed)| facility.stock.get(product_id).copied().unwrap_or(0) >= needed);

    let transit_days = (distance_km / KM_PER_TRANSIT_DAY).ceil() as u32;
    let processing_days = facility.processing_hours.div_ceil(24);
    let delivery_days = transit_days + processing_days;

    let penalty = if fully_stocked { 0.0 } else { UNDERSTOCK_PENALTY };
    let score = DISTANCE_WEIGHT * distance_km
        + COST_WEIGHT * shipping_cost
        + penalty
        + DAY_WEIGHT * f64::from(delivery_days);

    SourceEvaluation {
        facility_id: facility.id.clone(),
        facility_name: facility.name.clone(),
        kind: facility.kind,
        distance_km,
        fully_stocked,
        shipping_cost,
        processing_days,
        delivery_days,
        score,
    }
}

/// Pick the lowest-score facility; ties go to the candidate listed first.
///
/// Returns `None` when there are no candidates.
pub fn select_shipment_source(
    order: &SourcingOrder,
    customer: &GeoPoint,
    candidates: &[Facility],
    params: &SourcingParams,
) -> Option<ShipFromStoreResult> {
    let mut ranked: Vec<SourceEvaluation> = candidates
        .iter()
        .map(|f| evaluate_source(order, customer, f, params))
        .collect();
    // Stable: equal scores keep input order.
    ranked.sort_by(|a, b| a.score.total_cmp(&b.score));

    let mut ranked = ranked.into_iter();
    let Some(winner) = ranked.next() else {
        warn!(order = %order.order_id, "no candidate facilities for shipment source selection");
        return None;
    };

    let alternatives: Vec<SourceAlternative> = ranked
        .take(MAX_ALTERNATIVES)
        .map(|alt| {
            let reason = reason_against(&alt, &winner);
            SourceAlternative {
                source: alt,
                reason,
                reason_text: reason.to_string(),
            }
        })
        .collect();

    debug!(
        order = %order.order_id,
        candidates = candidates.len(),
        source = %winner.facility_id,
        score = winner.score,
        "shipment source selected"
    );

    Some(ShipFromStoreResult {
        order_id: order.order_id.clone(),
        recommended_source: winner,
        alternatives,
    })
}

fn required_quantities(order: &SourcingOrder) -> HashMap<&ProductId, i64> {
    let mut needed: HashMap<&ProductId, i64> = HashMap::new();
    for line in &order.lines {
        *needed.entry(&line.product_id).or_default() += i64::from(line.quantity);
    }
    needed
}

/// The alternative's dominant disadvantage versus the winner, measured in
/// score points.
fn reason_against(alt: &SourceEvaluation, winner: &SourceEvaluation) -> SourceReason {
    if winner.fully_stocked && !alt.fully_stocked {
        return SourceReason::InsufficientStock;
    }

    let transit_days = |e: &SourceEvaluation| f64::from(e.delivery_days - e.processing_days);
    let contributions = [
        (
            SourceReason::LongerDistance,
            DISTANCE_WEIGHT * (alt.distance_km - winner.distance_km)
                + DAY_WEIGHT * (transit_days(alt) - transit_days(winner)),
        ),
        (SourceReason::HigherCost, COST_WEIGHT * (alt.shipping_cost - winner.shipping_cost)),
        (
            SourceReason::LongerProcessing,
            DAY_WEIGHT * (f64::from(alt.processing_days) - f64::from(winner.processing_days)),
        ),
    ];

    let mut best = (SourceReason::LongerDistance, 0.0);
    for (reason, points) in contributions {
        if points > best.1 {
            best = (reason, points);
        }
    }
    best.0
}
