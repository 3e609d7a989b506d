//! Hot/warm/cold/frozen slotting by turnover percentile.
//!
//! Products are ranked by turnover rate (descending) and cut into four fixed
//! bands by rank fraction: top 20% hot (zone A), next 30% warm (B), next 30%
//! cold (C), bottom 20% frozen (D).

use serde::{Deserialize, Serialize};
use tracing::debug;

use depotiq_core::ProductId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneType {
    Hot,
    Warm,
    Cold,
    Frozen,
}

impl ZoneType {
    pub const ALL: [ZoneType; 4] =
        [ZoneType::Hot, ZoneType::Warm, ZoneType::Cold, ZoneType::Frozen];

    /// Storage zone label, in walk order.
    pub fn zone_label(self) -> &'static str {
        match self {
            ZoneType::Hot => "A",
            ZoneType::Warm => "B",
            ZoneType::Cold => "C",
            ZoneType::Frozen => "D",
        }
    }

    /// Band for a product at `rank` (0 = fastest mover) among `total`.
    fn for_rank(rank: usize, total: usize) -> ZoneType {
        let fraction = rank as f64 / total as f64;
        if fraction < 0.2 {
            ZoneType::Hot
        } else if fraction < 0.5 {
            ZoneType::Warm
        } else if fraction < 0.8 {
            ZoneType::Cold
        } else {
            ZoneType::Frozen
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductTurnover {
    pub product_id: ProductId,
    pub turnover_rate: f64,
    pub pick_frequency: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneProduct {
    pub product_id: ProductId,
    pub turnover_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotColdZone {
    pub zone: String,
    #[serde(rename = "type")]
    pub zone_type: ZoneType,
    pub products: Vec<ZoneProduct>,
    /// Sum of the members' pick frequencies.
    pub access_frequency: u64,
}

/// Always returns exactly four zones (A, B, C, D), possibly empty.
pub fn classify_hot_cold_zones(products: &[ProductTurnover]) -> Vec<HotColdZone> {
    let mut zones: Vec<HotColdZone> = ZoneType::ALL
        .iter()
        .map(|t| HotColdZone {
            zone: t.zone_label().to_string(),
            zone_type: *t,
            products: Vec::new(),
            access_frequency: 0,
        })
        .collect();

    let mut ranked: Vec<&ProductTurnover> = products.iter().collect();
    ranked.sort_by(|a, b| b.turnover_rate.total_cmp(&a.turnover_rate));

    let total = ranked.len();
    for (rank, p) in ranked.into_iter().enumerate() {
        let zone = &mut zones[ZoneType::for_rank(rank, total).index()];
        zone.products.push(ZoneProduct {
            product_id: p.product_id.clone(),
            turnover_rate: p.turnover_rate,
        });
        zone.access_frequency += p.pick_frequency;
    }

    debug!(
        products = total,
        hot = zones[0].products.len(),
        frozen = zones[3].products.len(),
        "hot/cold zones classified"
    );
    zones
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn turnover(id: &str, rate: f64, picks: u64) -> ProductTurnover {
        ProductTurnover {
            product_id: ProductId::new(id),
            turnover_rate: rate,
            pick_frequency: picks,
        }
    }

    fn ids(zone: &HotColdZone) -> Vec<&str> {
        zone.products.iter().map(|p| p.product_id.as_str()).collect()
    }

    #[test]
    fn ten_products_split_two_three_three_two() {
        let products: Vec<ProductTurnover> = (0..10)
            .map(|i| turnover(&format!("p{i}"), f64::from(i), 10 * (i as u64 + 1)))
            .collect();

        let zones = classify_hot_cold_zones(&products);

        assert_eq!(zones.len(), 4);
        assert_eq!(ids(&zones[0]), vec!["p9", "p8"]);
        assert_eq!(ids(&zones[1]), vec!["p7", "p6", "p5"]);
        assert_eq!(ids(&zones[2]), vec!["p4", "p3", "p2"]);
        assert_eq!(ids(&zones[3]), vec!["p1", "p0"]);

        assert_eq!(zones[0].zone, "A");
        assert_eq!(zones[0].zone_type, ZoneType::Hot);
        assert_eq!(zones[0].access_frequency, 100 + 90);
        assert_eq!(zones[3].zone, "D");
        assert_eq!(zones[3].access_frequency, 20 + 10);
    }

    #[test]
    fn empty_input_still_yields_four_zones() {
        let zones = classify_hot_cold_zones(&[]);
        assert_eq!(zones.len(), 4);
        assert!(zones.iter().all(|z| z.products.is_empty() && z.access_frequency == 0));
    }

    #[test]
    fn single_product_is_hot() {
        let zones = classify_hot_cold_zones(&[turnover("only", 0.0, 3)]);
        assert_eq!(ids(&zones[0]), vec!["only"]);
    }

    #[test]
    fn zone_type_serializes_as_type_field() {
        let zones = classify_hot_cold_zones(&[turnover("p", 1.0, 1)]);
        let json = serde_json::to_value(&zones[0]).unwrap();
        assert_eq!(json["type"], "hot");
        assert_eq!(json["zone"], "A");
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: zones partition the input set exactly.
        #[test]
        fn zones_partition_products(rates in prop::collection::vec(0.0f64..100.0, 0..80)) {
            let products: Vec<ProductTurnover> = rates
                .iter()
                .enumerate()
                .map(|(i, r)| turnover(&format!("p{i}"), *r, 1))
                .collect();

            let zones = classify_hot_cold_zones(&products);
            prop_assert_eq!(zones.len(), 4);

            let placed: Vec<&str> = zones
                .iter()
                .flat_map(|z| z.products.iter().map(|p| p.product_id.as_str()))
                .collect();
            let unique: HashSet<&str> = placed.iter().copied().collect();
            prop_assert_eq!(placed.len(), products.len());
            prop_assert_eq!(unique.len(), products.len());

            let total_access: u64 = zones.iter().map(|z| z.access_frequency).sum();
            prop_assert_eq!(total_access, products.len() as u64);
        }
    }
}
