//! ABC (revenue Pareto) × XYZ (demand variability) classification.
//!
//! - ABC: products sorted by revenue, descending; a product's class is decided
//!   by the cumulative revenue share *including* itself (`<= a_boundary` → A,
//!   `<= b_boundary` → B, otherwise C).
//! - XYZ: coefficient of variation of the product's sales history
//!   (`<= x_boundary` → X, `<= y_boundary` → Y, otherwise Z).

use serde::{Deserialize, Serialize};
use tracing::debug;

use depotiq_core::stats::{coefficient_of_variation, mean, std_dev};
use depotiq_core::{DomainError, DomainResult, ProductId};

/// Products listed per suggestion at most.
const SUGGESTION_PRODUCT_LIMIT: usize = 10;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AbcClass {
    A,
    B,
    C,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum XyzClass {
    X,
    Y,
    Z,
}

impl AbcClass {
    pub const ALL: [AbcClass; 3] = [AbcClass::A, AbcClass::B, AbcClass::C];

    pub fn as_str(self) -> &'static str {
        match self {
            AbcClass::A => "A",
            AbcClass::B => "B",
            AbcClass::C => "C",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl XyzClass {
    pub const ALL: [XyzClass; 3] = [XyzClass::X, XyzClass::Y, XyzClass::Z];

    pub fn as_str(self) -> &'static str {
        match self {
            XyzClass::X => "X",
            XyzClass::Y => "Y",
            XyzClass::Z => "Z",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Cumulative-share and CV boundaries.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbcXyzThresholds {
    /// Cumulative revenue percent (0-100) up to which products are A.
    pub a_boundary: f64,
    /// Cumulative revenue percent up to which products are B.
    pub b_boundary: f64,
    /// CV (ratio, not percent) up to which products are X.
    pub x_boundary: f64,
    /// CV up to which products are Y.
    pub y_boundary: f64,
}

impl Default for AbcXyzThresholds {
    fn default() -> Self {
        Self {
            a_boundary: 80.0,
            b_boundary: 95.0,
            x_boundary: 0.10,
            y_boundary: 0.25,
        }
    }
}

impl AbcXyzThresholds {
    pub fn validate(&self) -> DomainResult<()> {
        let all = [self.a_boundary, self.b_boundary, self.x_boundary, self.y_boundary];
        if all.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(DomainError::validation("thresholds must be finite and non-negative"));
        }
        if self.a_boundary > self.b_boundary || self.b_boundary > 100.0 {
            return Err(DomainError::validation("expected a_boundary <= b_boundary <= 100"));
        }
        if self.x_boundary > self.y_boundary {
            return Err(DomainError::validation("expected x_boundary <= y_boundary"));
        }
        Ok(())
    }

    pub fn abc_for(&self, cumulative_share: f64) -> AbcClass {
        if cumulative_share <= self.a_boundary {
            AbcClass::A
        } else if cumulative_share <= self.b_boundary {
            AbcClass::B
        } else {
            AbcClass::C
        }
    }

    pub fn xyz_for(&self, cv: f64) -> XyzClass {
        if cv <= self.x_boundary {
            XyzClass::X
        } else if cv <= self.y_boundary {
            XyzClass::Y
        } else {
            XyzClass::Z
        }
    }
}

/// Static advice attached to each of the nine matrix cells.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StrategyProfile {
    pub recommendation: &'static str,
    pub strategy: &'static str,
}

pub fn strategy_for(abc: AbcClass, xyz: XyzClass) -> StrategyProfile {
    use AbcClass::*;
    use XyzClass::*;

    let (recommendation, strategy) = match (abc, xyz) {
        (A, X) => (
            "Key product. Keep a constant stock level and forecast precisely.",
            "Continuous replenishment with a tight safety stock",
        ),
        (A, Y) => (
            "Important product with seasonal swings. Manage stock flexibly.",
            "Seasonal forecasting with adjustable buffers",
        ),
        (A, Z) => (
            "High revenue but unpredictable demand. Investigate the causes of fluctuation.",
            "Order against confirmed demand and hold an elevated safety stock",
        ),
        (B, X) => (
            "Stable mid-level demand. Standard stock management.",
            "Periodic review with a standard reorder point",
        ),
        (B, Y) => (
            "Medium importance, variable demand. Monitor regularly.",
            "Periodic review with seasonal adjustments",
        ),
        (B, Z) => (
            "Unstable sales. Consider optimising the assortment.",
            "Order on demand with a minimal buffer",
        ),
        (C, X) => (
            "Low but stable demand. Keep minimal stock.",
            "Infrequent bulk orders with minimal safety stock",
        ),
        (C, Y) => (
            "Low importance, unstable demand. Candidate for delisting.",
            "Order on demand only",
        ),
        (C, Z) => (
            "Lowest priority. Recommended for removal from the assortment.",
            "Phase out or move to drop-shipping",
        ),
    };

    StrategyProfile {
        recommendation,
        strategy,
    }
}

/// One product of the cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRevenue {
    pub product_id: ProductId,
    pub revenue: f64,
    /// Sales per period (daily or monthly), used for the XYZ axis.
    pub sales_history: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcXyzResult {
    pub product_id: ProductId,
    pub abc_class: AbcClass,
    pub xyz_class: XyzClass,
    /// Concatenation of both classes, e.g. `"AX"`.
    pub combined_class: String,
    pub revenue: f64,
    /// Percent (0-100) of cohort revenue.
    pub revenue_share: f64,
    pub cumulative_share: f64,
    /// Coefficient of variation (>= 0).
    pub sales_variation: f64,
    pub avg_sales: f64,
    pub std_dev: f64,
    pub recommendation: String,
    pub strategy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassSummary {
    pub product_count: usize,
    pub product_percent: f64,
    pub revenue: f64,
    pub revenue_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AbcXyzSummary {
    pub a: ClassSummary,
    pub b: ClassSummary,
    pub c: ClassSummary,
    pub x: ClassSummary,
    pub y: ClassSummary,
    pub z: ClassSummary,
}

impl AbcXyzSummary {
    pub fn abc(&self, class: AbcClass) -> &ClassSummary {
        match class {
            AbcClass::A => &self.a,
            AbcClass::B => &self.b,
            AbcClass::C => &self.c,
        }
    }

    pub fn xyz(&self, class: XyzClass) -> &ClassSummary {
        match class {
            XyzClass::X => &self.x,
            XyzClass::Y => &self.y,
            XyzClass::Z => &self.z,
        }
    }

    fn abc_mut(&mut self, class: AbcClass) -> &mut ClassSummary {
        match class {
            AbcClass::A => &mut self.a,
            AbcClass::B => &mut self.b,
            AbcClass::C => &mut self.c,
        }
    }

    fn xyz_mut(&mut self, class: XyzClass) -> &mut ClassSummary {
        match class {
            XyzClass::X => &mut self.x,
            XyzClass::Y => &mut self.y,
            XyzClass::Z => &mut self.z,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixCell {
    pub product_count: usize,
    pub product_percent: f64,
    pub revenue: f64,
    pub revenue_percent: f64,
    pub product_ids: Vec<ProductId>,
}

/// 3×3 matrix indexed `[abc][xyz]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AbcXyzMatrix {
    pub cells: [[MatrixCell; 3]; 3],
}

impl AbcXyzMatrix {
    pub fn cell(&self, abc: AbcClass, xyz: XyzClass) -> &MatrixCell {
        &self.cells[abc.index()][xyz.index()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcXyzAnalysis {
    pub total_revenue: f64,
    pub total_products: usize,
    /// Sorted by revenue, descending (ties keep input order).
    pub products: Vec<AbcXyzResult>,
    pub summary: AbcXyzSummary,
    pub matrix: AbcXyzMatrix,
}

/// Classify a cohort of products.
pub fn classify_abc_xyz(
    products: &[ProductRevenue],
    thresholds: &AbcXyzThresholds,
) -> AbcXyzAnalysis {
    let total_revenue: f64 = products.iter().map(|p| p.revenue).sum();

    let mut ordered: Vec<&ProductRevenue> = products.iter().collect();
    ordered.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));

    let mut cumulative_revenue = 0.0;
    let results: Vec<AbcXyzResult> = ordered
        .into_iter()
        .map(|p| {
            cumulative_revenue += p.revenue;
            let revenue_share = percent_of(p.revenue, total_revenue);
            let cumulative_share = percent_of(cumulative_revenue, total_revenue);

            let sales_variation = coefficient_of_variation(&p.sales_history);
            let abc_class = thresholds.abc_for(cumulative_share);
            let xyz_class = thresholds.xyz_for(sales_variation);
            let profile = strategy_for(abc_class, xyz_class);

            AbcXyzResult {
                product_id: p.product_id.clone(),
                abc_class,
                xyz_class,
                combined_class: format!("{}{}", abc_class.as_str(), xyz_class.as_str()),
                revenue: p.revenue,
                revenue_share,
                cumulative_share,
                sales_variation,
                avg_sales: mean(&p.sales_history),
                std_dev: std_dev(&p.sales_history),
                recommendation: profile.recommendation.to_string(),
                strategy: profile.strategy.to_string(),
            }
        })
        .collect();

    let summary = build_summary(&results, total_revenue);
    let matrix = build_matrix(&results, total_revenue);

    debug!(
        products = results.len(),
        total_revenue,
        a = summary.a.product_count,
        b = summary.b.product_count,
        c = summary.c.product_count,
        "abc-xyz classification computed"
    );

    AbcXyzAnalysis {
        total_revenue,
        total_products: results.len(),
        products: results,
        summary,
        matrix,
    }
}

fn percent_of(part: f64, total: f64) -> f64 {
    if total > 0.0 { part * 100.0 / total } else { 0.0 }
}

fn build_summary(results: &[AbcXyzResult], total_revenue: f64) -> AbcXyzSummary {
    let mut summary = AbcXyzSummary::default();
    for r in results {
        let abc = summary.abc_mut(r.abc_class);
        abc.product_count += 1;
        abc.revenue += r.revenue;

        let xyz = summary.xyz_mut(r.xyz_class);
        xyz.product_count += 1;
        xyz.revenue += r.revenue;
    }

    let total = results.len() as f64;
    for s in [
        &mut summary.a,
        &mut summary.b,
        &mut summary.c,
        &mut summary.x,
        &mut summary.y,
        &mut summary.z,
    ] {
        s.product_percent = percent_of(s.product_count as f64, total);
        s.revenue_percent = percent_of(s.revenue, total_revenue);
    }
    summary
}

fn build_matrix(results: &[AbcXyzResult], total_revenue: f64) -> AbcXyzMatrix {
    let mut matrix = AbcXyzMatrix::default();
    for r in results {
        let cell = &mut matrix.cells[r.abc_class.index()][r.xyz_class.index()];
        cell.product_count += 1;
        cell.revenue += r.revenue;
        cell.product_ids.push(r.product_id.clone());
    }

    let total = results.len() as f64;
    for cell in matrix.cells.iter_mut().flatten() {
        cell.product_percent = percent_of(cell.product_count as f64, total);
        cell.revenue_percent = percent_of(cell.revenue, total_revenue);
    }
    matrix
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionPriority {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationSuggestion {
    pub kind: String,
    pub priority: SuggestionPriority,
    pub title: String,
    pub description: String,
    pub impact: String,
    pub product_ids: Vec<ProductId>,
}

/// Actionable follow-ups for the riskiest cells of an analysis.
///
/// - CZ products: assortment reduction (high priority).
/// - AZ products: demand analysis (medium priority).
pub fn optimization_suggestions(analysis: &AbcXyzAnalysis) -> Vec<OptimizationSuggestion> {
    let mut suggestions = Vec::new();

    let cz = analysis.matrix.cell(AbcClass::C, XyzClass::Z);
    if cz.product_count > 0 {
        suggestions.push(OptimizationSuggestion {
            kind: "inventory_reduction".to_string(),
            priority: SuggestionPriority::High,
            title: "Assortment optimisation".to_string(),
            description: format!(
                "{} product(s) in CZ (low revenue, unstable demand). \
                 Consider removing them from the assortment.",
                cz.product_count
            ),
            impact: "Lower storage costs and less capital tied up in stock".to_string(),
            product_ids: cz.product_ids.iter().take(SUGGESTION_PRODUCT_LIMIT).cloned().collect(),
        });
    }

    let az = analysis.matrix.cell(AbcClass::A, XyzClass::Z);
    if az.product_count > 0 {
        suggestions.push(OptimizationSuggestion {
            kind: "demand_analysis".to_string(),
            priority: SuggestionPriority::Medium,
            title: "Unstable demand analysis".to_string(),
            description: format!(
                "{} high-revenue product(s) with unstable demand (AZ). \
                 Analyse what drives the fluctuation.",
                az.product_count
            ),
            impact: "Better forecasting and purchase planning".to_string(),
            product_ids: az.product_ids.iter().take(SUGGESTION_PRODUCT_LIMIT).cloned().collect(),
        });
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn product(id: &str, revenue: f64, sales_history: Vec<f64>) -> ProductRevenue {
        ProductRevenue {
            product_id: ProductId::new(id),
            revenue,
            sales_history,
        }
    }

    fn classes(analysis: &AbcXyzAnalysis) -> Vec<(&str, &str)> {
        analysis
            .products
            .iter()
            .map(|r| (r.product_id.as_str(), r.combined_class.as_str()))
            .collect()
    }

    #[test]
    fn boundary_products_fall_into_the_higher_class() {
        let cohort = vec![
            product("c", 5.0, vec![10.0, 10.0]),
            product("a", 80.0, vec![10.0, 10.0]),
            product("b", 15.0, vec![10.0, 10.0]),
        ];

        let analysis = classify_abc_xyz(&cohort, &AbcXyzThresholds::default());

        assert_eq!(classes(&analysis), vec![("a", "AX"), ("b", "BX"), ("c", "CX")]);
        assert_eq!(analysis.products[0].cumulative_share, 80.0);
        assert_eq!(analysis.products[1].cumulative_share, 95.0);
        assert_eq!(analysis.total_revenue, 100.0);
    }

    #[test]
    fn xyz_uses_coefficient_of_variation() {
        let cohort = vec![
            product("steady", 10.0, vec![10.0; 6]),
            // mean 10, std 2 -> cv 0.2
            product("wobbly", 10.0, vec![8.0, 12.0, 8.0, 12.0]),
            // mean 10, std 3 -> cv 0.3
            product("erratic", 10.0, vec![7.0, 13.0, 7.0, 13.0]),
        ];

        let analysis = classify_abc_xyz(&cohort, &AbcXyzThresholds::default());
        let by_id = |id: &str| {
            analysis.products.iter().find(|r| r.product_id.as_str() == id).unwrap()
        };

        assert_eq!(by_id("steady").xyz_class, XyzClass::X);
        assert_eq!(by_id("steady").sales_variation, 0.0);
        assert_eq!(by_id("wobbly").xyz_class, XyzClass::Y);
        assert_eq!(by_id("erratic").xyz_class, XyzClass::Z);
        assert!((by_id("erratic").sales_variation - 0.3).abs() < 1e-12);
    }

    #[test]
    fn summary_and_matrix_account_for_every_product() {
        let cohort = vec![
            product("p1", 700.0, vec![10.0, 10.0]),
            product("p2", 200.0, vec![1.0, 9.0]),
            product("p3", 60.0, vec![1.0, 9.0]),
            product("p4", 40.0, vec![5.0, 5.0]),
        ];

        let analysis = classify_abc_xyz(&cohort, &AbcXyzThresholds::default());

        assert_eq!(
            classes(&analysis),
            vec![("p1", "AX"), ("p2", "BZ"), ("p3", "CZ"), ("p4", "CX")]
        );
        assert_eq!(analysis.summary.a.product_count, 1);
        assert_eq!(analysis.summary.c.product_count, 2);
        assert_eq!(analysis.summary.c.product_percent, 50.0);
        assert_eq!(analysis.summary.z.revenue, 260.0);
        assert_eq!(
            analysis.matrix.cell(AbcClass::C, XyzClass::Z).product_ids,
            vec![ProductId::new("p3")]
        );

        let counted: usize = analysis.matrix.cells.iter().flatten().map(|c| c.product_count).sum();
        assert_eq!(counted, 4);
    }

    #[test]
    fn every_cell_has_a_strategy() {
        for abc in AbcClass::ALL {
            for xyz in XyzClass::ALL {
                let profile = strategy_for(abc, xyz);
                assert!(!profile.recommendation.is_empty());
                assert!(!profile.strategy.is_empty());
            }
        }
    }

    #[test]
    fn suggestions_flag_cz_and_az_cells() {
        let cohort = vec![
            product("star", 900.0, vec![1.0, 30.0]),
            product("tail", 10.0, vec![0.0, 4.0]),
        ];
        let analysis = classify_abc_xyz(&cohort, &AbcXyzThresholds::default());
        // star alone is 98.9% of revenue: C by cumulative share.
        assert_eq!(analysis.products[0].abc_class, AbcClass::C);

        let thresholds = AbcXyzThresholds {
            a_boundary: 99.0,
            b_boundary: 99.5,
            ..Default::default()
        };
        let analysis = classify_abc_xyz(&cohort, &thresholds);
        let suggestions = optimization_suggestions(&analysis);

        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].kind, "inventory_reduction");
        assert_eq!(suggestions[0].product_ids, vec![ProductId::new("tail")]);
        assert_eq!(suggestions[1].priority, SuggestionPriority::Medium);
        assert_eq!(suggestions[1].product_ids, vec![ProductId::new("star")]);
    }

    #[test]
    fn thresholds_are_validated() {
        assert!(AbcXyzThresholds::default().validate().is_ok());
        let bad = AbcXyzThresholds { a_boundary: 96.0, ..Default::default() };
        assert!(matches!(bad.validate(), Err(DomainError::Validation(_))));
        let bad = AbcXyzThresholds { y_boundary: f64::NAN, ..Default::default() };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn partial_thresholds_json_keeps_defaults() {
        let thresholds: AbcXyzThresholds = serde_json::from_str(r#"{"a_boundary": 70.0}"#).unwrap();
        assert_eq!(thresholds.a_boundary, 70.0);
        assert_eq!(
            thresholds,
            AbcXyzThresholds { a_boundary: 70.0, ..Default::default() }
        );
    }

    #[test]
    fn empty_cohort_yields_empty_analysis() {
        let analysis = classify_abc_xyz(&[], &AbcXyzThresholds::default());
        assert_eq!(analysis.total_products, 0);
        assert!(analysis.products.is_empty());
        assert_eq!(analysis.summary, AbcXyzSummary::default());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: ABC partitions the cohort, shares sum to 100 and each
        /// class respects its cumulative-share boundary.
        #[test]
        fn abc_partitions_the_cohort(revenues in prop::collection::vec(1.0f64..10_000.0, 1..40)) {
            let cohort: Vec<ProductRevenue> = revenues
                .iter()
                .enumerate()
                .map(|(i, r)| product(&format!("p{i}"), *r, vec![1.0, 2.0]))
                .collect();

            let analysis = classify_abc_xyz(&cohort, &AbcXyzThresholds::default());
            prop_assert_eq!(analysis.products.len(), cohort.len());

            let share_sum: f64 = analysis.products.iter().map(|r| r.revenue_share).sum();
            prop_assert!((share_sum - 100.0).abs() < 1e-6);

            let class_total = analysis.summary.a.product_count
                + analysis.summary.b.product_count
                + analysis.summary.c.product_count;
            prop_assert_eq!(class_total, cohort.len());

            for r in &analysis.products {
                match r.abc_class {
                    AbcClass::A => prop_assert!(r.cumulative_share <= 80.0),
                    AbcClass::B => {
                        prop_assert!(r.cumulative_share > 80.0 && r.cumulative_share <= 95.0)
                    }
                    AbcClass::C => prop_assert!(r.cumulative_share > 95.0),
                }
            }

            let ranks: Vec<AbcClass> = analysis.products.iter().map(|r| r.abc_class).collect();
            prop_assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
