//! Primitive statistics shared by every analytical component.
//!
//! All functions are total: degenerate inputs (empty slices, zero means)
//! map to `0.0` instead of `NaN`.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the great-circle distance.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// z-score used when a confidence level is not in the lookup table.
pub const DEFAULT_Z_SCORE: f64 = 1.645;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        great_circle_distance_km(self.lat, self.lng, other.lat, other.lng)
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / (values.len() as f64)
}

/// Population standard deviation (divides by n). Fewer than 2 samples yield 0.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values
        .iter()
        .map(|x| {
            let d = x - m;
            d * d
        })
        .sum::<f64>()
        / (values.len() as f64);
    var.sqrt()
}

/// `std_dev / mean`, or 0 when there is no variability signal
/// (fewer than 2 samples or a zero mean).
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    if m == 0.0 {
        return 0.0;
    }
    std_dev(values) / m
}

/// One-sided z value for a service/confidence level.
///
/// Only 0.90, 0.95 and 0.99 are tabulated; anything else falls back to
/// [`DEFAULT_Z_SCORE`].
pub fn z_score(confidence: f64) -> f64 {
    const TABLE: [(f64, f64); 3] = [(0.90, 1.28), (0.95, 1.645), (0.99, 2.33)];
    TABLE
        .iter()
        .find(|(level, _)| (confidence - level).abs() < 1e-9)
        .map(|(_, z)| *z)
        .unwrap_or(DEFAULT_Z_SCORE)
}

/// Haversine distance between two coordinates, in kilometres.
pub fn great_circle_distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let (lat1_rad, lng1_rad) = (lat1.to_radians(), lng1.to_radians());
    let (lat2_rad, lng2_rad) = (lat2.to_radians(), lng2.to_radians());
    let dlat = lat2_rad - lat1_rad;
    let dlng = lng2_rad - lng1_rad;
    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Ordinary least-squares fit of `values` against x = 0, 1, 2, ...
///
/// Returns `(slope, intercept)`. Fewer than 2 points give a flat line through
/// the mean.
pub fn linear_regression(values: &[f64]) -> (f64, f64) {
    let n = values.len();
    if n < 2 {
        return (0.0, mean(values));
    }
    let n_f = n as f64;
    let x_mean = (n_f - 1.0) / 2.0;
    let y_mean = mean(values);

    let mut num = 0.0;
    let mut den = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        num += dx * (y - y_mean);
        den += dx * dx;
    }

    let slope = if den == 0.0 { 0.0 } else { num / den };
    (slope, y_mean - slope * x_mean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn std_dev_is_population_and_guards_short_input() {
        assert_eq!(std_dev(&[]), 0.0);
        assert_eq!(std_dev(&[42.0]), 0.0);
        assert!((std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn coefficient_of_variation_handles_zero_mean() {
        assert_eq!(coefficient_of_variation(&[0.0, 0.0, 0.0]), 0.0);
        assert_eq!(coefficient_of_variation(&[5.0]), 0.0);
        assert_eq!(coefficient_of_variation(&[10.0, 10.0, 10.0]), 0.0);
        assert!((coefficient_of_variation(&[5.0, 15.0]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn z_score_lookup_and_default() {
        assert_eq!(z_score(0.90), 1.28);
        assert_eq!(z_score(0.95), 1.645);
        assert_eq!(z_score(0.99), 2.33);
        assert_eq!(z_score(0.5), DEFAULT_Z_SCORE);
        assert_eq!(z_score(f64::NAN), DEFAULT_Z_SCORE);
    }

    #[test]
    fn great_circle_distance_kyiv_to_lviv() {
        // Kyiv (50.4501, 30.5234) to Lviv (49.8397, 24.0297) is roughly 468 km.
        let d = great_circle_distance_km(50.4501, 30.5234, 49.8397, 24.0297);
        assert!((d - 468.0).abs() < 5.0, "got {d}");
        assert_eq!(great_circle_distance_km(10.0, 20.0, 10.0, 20.0), 0.0);
    }

    #[test]
    fn linear_regression_recovers_line() {
        let (slope, intercept) = linear_regression(&[1.0, 3.0, 5.0, 7.0]);
        assert!((slope - 2.0).abs() < 1e-12);
        assert!((intercept - 1.0).abs() < 1e-12);

        assert_eq!(linear_regression(&[4.0]), (0.0, 4.0));
        assert_eq!(linear_regression(&[]), (0.0, 0.0));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: standard deviation and CV are never negative.
        #[test]
        fn dispersion_is_non_negative(values in prop::collection::vec(0.0f64..10_000.0, 0..64)) {
            prop_assert!(std_dev(&values) >= 0.0);
            prop_assert!(coefficient_of_variation(&values) >= 0.0);
        }

        /// Property: distance is symmetric.
        #[test]
        fn distance_is_symmetric(
            lat1 in -89.0f64..89.0, lng1 in -179.0f64..179.0,
            lat2 in -89.0f64..89.0, lng2 in -179.0f64..179.0,
        ) {
            let ab = great_circle_distance_km(lat1, lng1, lat2, lng2);
            let ba = great_circle_distance_km(lat2, lng2, lat1, lng1);
            prop_assert!((ab - ba).abs() < 1e-6);
        }
    }
}
