//! Pick-wave batching.
//!
//! Orders are stable-sorted by priority and packed greedily: a batch is closed
//! as soon as the next order would push it past the order or item cap. Every
//! order lands in exactly one batch.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use depotiq_core::{DomainError, DomainResult, OrderId, ProductId};

pub const DEFAULT_MAX_ORDERS_PER_BATCH: usize = 10;
pub const DEFAULT_MAX_ITEMS_PER_BATCH: u64 = 50;

const MINUTES_PER_ITEM: f64 = 0.5;
const MINUTES_PER_ZONE: f64 = 1.0;

/// Ordered by urgency: `Express < Standard < Economy`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderPriority {
    Express,
    Standard,
    Economy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickLine {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Storage zone label (e.g. "A"); zones are walked in lexical order.
    pub zone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickOrder {
    pub order_id: OrderId,
    pub priority: OrderPriority,
    pub lines: Vec<PickLine>,
}

impl PickOrder {
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteProduct {
    pub product_id: ProductId,
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStop {
    pub zone: String,
    pub products: Vec<RouteProduct>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WavePickingBatch {
    pub batch_id: String,
    pub orders: Vec<OrderId>,
    pub total_items: u64,
    pub total_products: usize,
    /// Minutes, rounded up.
    pub estimated_time: u64,
    pub route: Vec<RouteStop>,
    /// Most urgent priority among the batch's orders.
    pub priority: OrderPriority,
}

/// Batch caps for wave planning.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WavePlanner {
    pub max_orders_per_batch: usize,
    pub max_items_per_batch: u64,
}

impl Default for WavePlanner {
    fn default() -> Self {
        Self {
            max_orders_per_batch: DEFAULT_MAX_ORDERS_PER_BATCH,
            max_items_per_batch: DEFAULT_MAX_ITEMS_PER_BATCH,
        }
    }
}

impl WavePlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_orders(mut self, max_orders_per_batch: usize) -> Self {
        self.max_orders_per_batch = max_orders_per_batch;
        self
    }

    pub fn with_max_items(mut self, max_items_per_batch: u64) -> Self {
        self.max_items_per_batch = max_items_per_batch;
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.max_orders_per_batch == 0 {
            return Err(DomainError::validation("max_orders_per_batch must be >= 1"));
        }
        if self.max_items_per_batch == 0 {
            return Err(DomainError::validation("max_items_per_batch must be >= 1"));
        }
        Ok(())
    }

    /// Partition `orders` into pick waves.
    ///
    /// An order that alone exceeds the item cap is given a batch of its own;
    /// that is the only case in which a batch goes over `max_items_per_batch`.
    pub fn plan(&self, orders: &[PickOrder]) -> DomainResult<Vec<WavePickingBatch>> {
        self.validate()?;

        let mut sorted: Vec<&PickOrder> = orders.iter().collect();
        sorted.sort_by_key(|o| o.priority);

        let mut batches = Vec::new();
        let mut current: Vec<&PickOrder> = Vec::new();
        let mut current_items: u64 = 0;

        for order in sorted {
            let items = order.total_items();
            if items > self.max_items_per_batch {
                warn!(
                    order = %order.order_id,
                    items,
                    max_items = self.max_items_per_batch,
                    "order exceeds the per-batch item cap; picking it in its own wave"
                );
            }

            let over_orders = current.len() + 1 > self.max_orders_per_batch;
            let over_items = current_items + items > self.max_items_per_batch;
            if !current.is_empty() && (over_orders || over_items) {
                batches.push(build_batch(batches.len() + 1, &current));
                current.clear();
                current_items = 0;
            }

            current.push(order);
            current_items += items;
        }
        if !current.is_empty() {
            batches.push(build_batch(batches.len() + 1, &current));
        }

        debug!(orders = orders.len(), batches = batches.len(), "pick waves planned");
        Ok(batches)
    }
}

/// `WavePlanner` shorthand with explicit caps.
pub fn create_wave_picking_batches(
    orders: &[PickOrder],
    max_orders_per_batch: usize,
    max_items_per_batch: u64,
) -> DomainResult<Vec<WavePickingBatch>> {
    WavePlanner::new()
        .with_max_orders(max_orders_per_batch)
        .with_max_items(max_items_per_batch)
        .plan(orders)
}

fn build_batch(seq: usize, orders: &[&PickOrder]) -> WavePickingBatch {
    let mut by_zone: BTreeMap<&str, BTreeMap<&ProductId, u64>> = BTreeMap::new();
    let mut distinct: BTreeSet<&ProductId> = BTreeSet::new();
    let mut total_items = 0;

    for order in orders {
        for line in &order.lines {
            *by_zone
                .entry(line.zone.as_str())
                .or_default()
                .entry(&line.product_id)
                .or_default() += u64::from(line.quantity);
            distinct.insert(&line.product_id);
            total_items += u64::from(line.quantity);
        }
    }

    let zones_visited = by_zone.len();
    let route = by_zone
        .into_iter()
        .map(|(zone, products)| RouteStop {
            zone: zone.to_string(),
            products: products
                .into_iter()
                .map(|(product_id, quantity)| RouteProduct {
                    product_id: product_id.clone(),
                    quantity,
                })
                .collect(),
        })
        .collect();

    let minutes = total_items as f64 * MINUTES_PER_ITEM + zones_visited as f64 * MINUTES_PER_ZONE;

    WavePickingBatch {
        batch_id: format!("WAVE-{seq:03}"),
        orders: orders.iter().map(|o| o.order_id.clone()).collect(),
        total_items,
        total_products: distinct.len(),
        estimated_time: minutes.ceil() as u64,
        route,
        priority: orders.iter().map(|o| o.priority).min().unwrap_or(OrderPriority::Economy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn line(product: &str, quantity: u32, zone: &str) -> PickLine {
        PickLine {
            product_id: ProductId::new(product),
            quantity,
            zone: zone.to_string(),
        }
    }

    fn order(id: &str, priority: OrderPriority, lines: Vec<PickLine>) -> PickOrder {
        PickOrder {
            order_id: OrderId::new(id),
            priority,
            lines,
        }
    }

    fn order_ids(batch: &WavePickingBatch) -> Vec<&str> {
        batch.orders.iter().map(|o| o.as_str()).collect()
    }

    #[test]
    fn express_orders_are_batched_first_and_ties_keep_input_order() {
        let orders = vec![
            order("eco-1", OrderPriority::Economy, vec![line("P1", 1, "A")]),
            order("std-1", OrderPriority::Standard, vec![line("P2", 1, "B")]),
            order("exp-1", OrderPriority::Express, vec![line("P3", 1, "C")]),
            order("std-2", OrderPriority::Standard, vec![line("P4", 1, "A")]),
        ];

        let batches = create_wave_picking_batches(&orders, 2, 50).unwrap();

        assert_eq!(batches.len(), 2);
        assert_eq!(order_ids(&batches[0]), vec!["exp-1", "std-1"]);
        assert_eq!(batches[0].priority, OrderPriority::Express);
        assert_eq!(order_ids(&batches[1]), vec!["std-2", "eco-1"]);
        assert_eq!(batches[1].priority, OrderPriority::Standard);
        assert_eq!(batches[0].batch_id, "WAVE-001");
        assert_eq!(batches[1].batch_id, "WAVE-002");
    }

    #[test]
    fn item_cap_closes_a_batch() {
        let orders = vec![
            order("o1", OrderPriority::Standard, vec![line("P1", 30, "A")]),
            order("o2", OrderPriority::Standard, vec![line("P2", 20, "A")]),
            order("o3", OrderPriority::Standard, vec![line("P3", 1, "A")]),
        ];

        let batches = create_wave_picking_batches(&orders, 10, 50).unwrap();

        assert_eq!(batches.len(), 2);
        assert_eq!(order_ids(&batches[0]), vec!["o1", "o2"]);
        assert_eq!(batches[0].total_items, 50);
        assert_eq!(order_ids(&batches[1]), vec!["o3"]);
    }

    #[test]
    fn route_groups_products_by_zone_in_walk_order() {
        let orders = vec![
            order("o1", OrderPriority::Standard, vec![line("P9", 2, "C"), line("P1", 3, "A")]),
            order("o2", OrderPriority::Economy, vec![line("P1", 4, "A"), line("P5", 1, "B")]),
        ];

        let batches = create_wave_picking_batches(&orders, 10, 50).unwrap();
        let batch = &batches[0];

        let zones: Vec<&str> = batch.route.iter().map(|s| s.zone.as_str()).collect();
        assert_eq!(zones, vec!["A", "B", "C"]);
        assert_eq!(
            batch.route[0].products,
            vec![RouteProduct { product_id: ProductId::new("P1"), quantity: 7 }]
        );
        assert_eq!(batch.total_items, 10);
        assert_eq!(batch.total_products, 3);
        // 10 items * 0.5 + 3 zones * 1
        assert_eq!(batch.estimated_time, 8);
    }

    #[test]
    fn estimated_time_rounds_up() {
        let orders = vec![order("o1", OrderPriority::Express, vec![line("P1", 3, "A")])];
        let batches = create_wave_picking_batches(&orders, 10, 50).unwrap();
        // 1.5 + 1 = 2.5 -> 3
        assert_eq!(batches[0].estimated_time, 3);
    }

    #[test]
    fn oversized_order_gets_its_own_batch() {
        let orders = vec![
            order("small-1", OrderPriority::Standard, vec![line("P1", 5, "A")]),
            order("huge", OrderPriority::Standard, vec![line("P2", 80, "B")]),
            order("small-2", OrderPriority::Standard, vec![line("P3", 5, "A")]),
        ];

        let batches = create_wave_picking_batches(&orders, 10, 50).unwrap();

        assert_eq!(batches.len(), 3);
        assert_eq!(order_ids(&batches[1]), vec!["huge"]);
    }

    #[test]
    fn empty_input_and_invalid_caps() {
        assert!(create_wave_picking_batches(&[], 10, 50).unwrap().is_empty());
        assert!(matches!(
            create_wave_picking_batches(&[], 0, 50),
            Err(DomainError::Validation(_))
        ));
        assert!(create_wave_picking_batches(&[], 10, 0).is_err());
    }

    fn priority_strategy() -> impl Strategy<Value = OrderPriority> {
        prop_oneof![
            Just(OrderPriority::Express),
            Just(OrderPriority::Standard),
            Just(OrderPriority::Economy),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: batches partition the orders and respect both caps.
        #[test]
        fn batches_respect_caps_and_partition_orders(
            specs in prop::collection::vec((priority_strategy(), 1u32..20, 0usize..4), 0..60),
            max_orders in 1usize..12,
            max_items in 20u64..80,
        ) {
            let zones = ["A", "B", "C", "D"];
            let orders: Vec<PickOrder> = specs
                .iter()
                .enumerate()
                .map(|(i, (p, qty, zone))| {
                    let lines = vec![line(&format!("P{}", i % 7), *qty, zones[*zone])];
                    order(&format!("o{i}"), *p, lines)
                })
                .collect();

            let batches = create_wave_picking_batches(&orders, max_orders, max_items).unwrap();

            let mut seen = HashSet::new();
            for b in &batches {
                prop_assert!(!b.orders.is_empty());
                prop_assert!(b.orders.len() <= max_orders);
                prop_assert!(b.total_items <= max_items);
                for o in &b.orders {
                    prop_assert!(seen.insert(o.clone()));
                }
            }
            prop_assert_eq!(seen.len(), orders.len());
        }
    }
}
