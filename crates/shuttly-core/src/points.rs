// ── Boarding & deboarding points ──
//
// Fixed pickup/drop lists per known city; an unknown city falls back
// to a single generic stop so the flow never dead-ends. Point ids are
// deterministic slugs so the same city always produces the same list.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardingPoint {
    pub id: String,
    pub name: String,
}

impl BoardingPoint {
    fn new(city: &str, name: &str) -> Self {
        Self {
            id: slug(city, name),
            name: name.to_owned(),
        }
    }
}

/// The pickup/drop points for a city.
pub fn points_for_city(city: &str) -> Vec<BoardingPoint> {
    let names: &[&str] = match city {
        "Lucknow" => &["Alambagh Bus Stand", "Charbagh Station", "Hazratganj Crossing"],
        "Kanpur" => &["Jhakarkati Bus Stand", "Rawatpur Station", "Kakadeo Market"],
        "Prayagraj" => &["Civil Lines Bus Stand", "Prayag Junction"],
        "Varanasi" => &["Cantt Bus Stand", "Lanka Gate", "Sarnath Crossing"],
        "Ayodhya" => &["Ayodhya Dham Bus Stand", "Saket Crossing"],
        "Gorakhpur" => &["Railway Bus Stand", "University Gate"],
        _ => return vec![BoardingPoint::new(city, "Main Stop")],
    };
    names
        .iter()
        .map(|name| BoardingPoint::new(city, name))
        .collect()
}

fn slug(city: &str, name: &str) -> String {
    format!("{city}-{name}")
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}
