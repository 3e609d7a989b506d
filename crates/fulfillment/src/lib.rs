//! Order fulfillment planning: pick-wave batching and ship-from-store sourcing.

pub mod sourcing;
pub mod wave;

pub use sourcing::{
    DEFAULT_COST_PER_KM, Facility, FacilityKind, OrderLine, ShipFromStoreResult, SourceAlternative,
    SourceEvaluation, SourceReason, SourcingOrder, SourcingParams, evaluate_source,
    select_shipment_source,
};
pub use wave::{
    DEFAULT_MAX_ITEMS_PER_BATCH, DEFAULT_MAX_ORDERS_PER_BATCH, OrderPriority, PickLine, PickOrder,
    RouteProduct, RouteStop, WavePickingBatch, WavePlanner, create_wave_picking_batches,
};
