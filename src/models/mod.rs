mod cuisine;
mod recommendation;
mod restaurant;
mod visit;

pub use cuisine::CanonicalCuisine;
pub use recommendation::{
    CuisineAverage, CuisineCount, Insights, RankedRecommendation, RatingPoint, Recommendation,
};
pub use restaurant::RestaurantRecord;
pub use visit::{TrainingExample, VisitRecord};

/// Serializes a boolean flag as the 0/1 integer used by the table schemas
pub(crate) mod flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    /// Accepts `true`/`false` as well as `0`/`1`
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Flag {
            Bool(bool),
            Int(u8),
        }

        match Flag::deserialize(deserializer)? {
            Flag::Bool(b) => Ok(b),
            Flag::Int(0) => Ok(false),
            Flag::Int(1) => Ok(true),
            Flag::Int(other) => Err(serde::de::Error::custom(format!(
                "expected 0 or 1, got {}",
                other
            ))),
        }
    }
}
