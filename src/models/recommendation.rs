use chrono::NaiveDate;
use serde::Serialize;

use super::{flag, CanonicalCuisine, RestaurantRecord, VisitRecord};

/// A candidate restaurant scored by the preference model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRecommendation {
    #[serde(flatten)]
    pub restaurant: RestaurantRecord,
    #[serde(rename = "CanonicalCuisine")]
    pub canonical_cuisine: CanonicalCuisine,
    #[serde(rename = "Predicted_Like", with = "flag")]
    pub predicted_like: bool,
    /// Predicted probability of liking the restaurant
    #[serde(rename = "Confidence")]
    pub confidence: f64,
}

/// Where to eat and what to order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub top: RankedRecommendation,
    pub top_cuisine: CanonicalCuisine,
    /// Best-loved dishes from history in the top cuisine; empty when nothing qualifies
    pub dishes: Vec<VisitRecord>,
    /// Every candidate, highest confidence first
    pub ranked: Vec<RankedRecommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CuisineAverage {
    pub cuisine: CanonicalCuisine,
    pub average_rating: f64,
    pub visits: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CuisineCount {
    pub cuisine: CanonicalCuisine,
    pub liked: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingPoint {
    pub date: NaiveDate,
    pub dish: String,
    pub cuisine: CanonicalCuisine,
    pub personal_rating: u8,
}

/// Aggregates over the visit history
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Insights {
    pub average_rating_by_cuisine: Vec<CuisineAverage>,
    pub liked_by_cuisine: Vec<CuisineCount>,
    pub rating_timeline: Vec<RatingPoint>,
}
