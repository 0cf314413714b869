// ── Fare calculation ──
//
// Pure pricing policy: a fixed inter-city distance table, a base fare,
// a per-km rate, and a tax multiplier. Unknown or degenerate routes
// price to zero, which callers treat as "unbookable" -- submission is
// gated on a positive fare.

use std::collections::HashMap;

/// Flat component of every ticket, in rupees.
pub const BASE_FARE: f64 = 50.0;
/// Per-kilometre rate, in rupees.
pub const RATE_PER_KM: f64 = 2.5;
/// Tax multiplier applied to the subtotal.
pub const GST_MULTIPLIER: f64 = 1.05;

/// Pricing seam for the booking flow.
///
/// The flow never looks inside; swapping the policy (promotions,
/// dynamic pricing) touches nothing else.
pub trait FarePolicy: Send + Sync {
    /// Price of one seat for an (origin, destination) pair.
    ///
    /// Returns `0.0` for unknown or degenerate pairs.
    fn single_ticket_fare(&self, origin: &str, destination: &str) -> f64;
}

/// The default policy: symmetric distance-table lookup.
pub struct DistanceTableFare {
    /// Keyed by the sorted city pair joined with `-`, so lookups are
    /// order-independent.
    distances: HashMap<String, f64>,
    base_fare: f64,
    rate_per_km: f64,
    gst_multiplier: f64,
}

impl DistanceTableFare {
    pub fn new(
        distances: HashMap<String, f64>,
        base_fare: f64,
        rate_per_km: f64,
        gst_multiplier: f64,
    ) -> Self {
        Self {
            distances,
            base_fare,
            rate_per_km,
            gst_multiplier,
        }
    }

    /// The cities the distance table knows about, sorted and deduplicated.
    pub fn known_cities(&self) -> Vec<String> {
        let mut cities: Vec<String> = self
            .distances
            .keys()
            .flat_map(|key| key.split('-').map(String::from))
            .collect();
        cities.sort();
        cities.dedup();
        cities
    }
}

impl Default for DistanceTableFare {
    fn default() -> Self {
        let pairs: [(&str, &str, f64); 10] = [
            ("Lucknow", "Kanpur", 95.0),
            ("Lucknow", "Ayodhya", 135.0),
            ("Lucknow", "Prayagraj", 200.0),
            ("Lucknow", "Varanasi", 305.0),
            ("Lucknow", "Gorakhpur", 270.0),
            ("Kanpur", "Prayagraj", 210.0),
            ("Kanpur", "Ayodhya", 220.0),
            ("Prayagraj", "Varanasi", 120.0),
            ("Ayodhya", "Gorakhpur", 135.0),
            ("Varanasi", "Gorakhpur", 200.0),
        ];
        let distances = pairs
            .into_iter()
            .map(|(a, b, km)| (route_key(a, b), km))
            .collect();
        Self::new(distances, BASE_FARE, RATE_PER_KM, GST_MULTIPLIER)
    }
}

impl FarePolicy for DistanceTableFare {
    fn single_ticket_fare(&self, origin: &str, destination: &str) -> f64 {
        if origin.is_empty() || destination.is_empty() || origin == destination {
            return 0.0;
        }
        let Some(distance) = self.distances.get(&route_key(origin, destination)) else {
            return 0.0;
        };
        let subtotal = self.base_fare + distance * self.rate_per_km;
        round2(subtotal * self.gst_multiplier)
    }
}

/// Order-independent lookup key: sorted pair joined with `-`.
fn route_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}-{b}")
    } else {
        format!("{b}-{a}")
    }
}

/// Round to two decimal places (paise).
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worked_example_lucknow_kanpur() {
        let policy = DistanceTableFare::default();
        // (50 + 95 * 2.5) * 1.05 = 301.875 → 301.88
        assert_eq!(policy.single_ticket_fare("Lucknow", "Kanpur"), 301.88);
    }

    #[test]
    fn fare_is_symmetric_for_every_known_pair() {
        let policy = DistanceTableFare::default();
        let cities = policy.known_cities();
        for a in &cities {
            for b in &cities {
                assert_eq!(
                    policy.single_ticket_fare(a, b),
                    policy.single_ticket_fare(b, a),
                    "fare({a}, {b}) differs from fare({b}, {a})"
                );
            }
        }
    }

    #[test]
    fn same_city_is_free() {
        let policy = DistanceTableFare::default();
        assert_eq!(policy.single_ticket_fare("Kanpur", "Kanpur"), 0.0);
    }

    #[test]
    fn empty_city_is_free() {
        let policy = DistanceTableFare::default();
        assert_eq!(policy.single_ticket_fare("", "Kanpur"), 0.0);
        assert_eq!(policy.single_ticket_fare("Lucknow", ""), 0.0);
    }

    #[test]
    fn unknown_pair_is_free() {
        let policy = DistanceTableFare::default();
        assert_eq!(policy.single_ticket_fare("Lucknow", "Mumbai"), 0.0);
    }

    #[test]
    fn known_cities_are_sorted_and_unique() {
        let policy = DistanceTableFare::default();
        let cities = policy.known_cities();
        assert!(cities.contains(&"Lucknow".to_owned()));
        assert!(cities.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn rounding_is_to_two_places() {
        assert_eq!(round2(301.875), 301.88);
        assert_eq!(round2(301.874), 301.87);
    }
}
