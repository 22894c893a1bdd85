use serde::{Deserialize, Serialize};

/// A restaurant the user could visit
///
/// Identity is the name, but duplicates are legal. Rating and price are passed through to the
/// model untouched; range checks happen before a record is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RestaurantRecord {
    pub name: String,
    /// Free-text cuisine as entered
    pub cuisine: String,
    /// Public rating, 0.0 to 5.0
    pub rating: f64,
    /// Price level, 1 (cheap) to 4 (expensive)
    pub price: u8,
}

impl RestaurantRecord {
    pub fn new(name: impl Into<String>, cuisine: impl Into<String>, rating: f64, price: u8) -> Self {
        Self {
            name: name.into(),
            cuisine: cuisine.into(),
            rating,
            price,
        }
    }
}
