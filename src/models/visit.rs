use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{flag, RestaurantRecord};

/// One dish tasted at a restaurant, as recorded in the user's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VisitRecord {
    #[serde(flatten)]
    pub restaurant: RestaurantRecord,
    #[serde(with = "flag")]
    pub liked: bool,
    pub date_visited: NaiveDate,
    pub dish: String,
    /// Personal dish rating, 1 to 10
    pub personal_rating: u8,
}

/// A history row projected onto model inputs
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingExample {
    /// One-hot cuisine columns
    pub cuisine: Vec<f64>,
    pub rating: f64,
    pub price: u8,
    pub liked: bool,
}

impl TrainingExample {
    /// Model input vector: `[one-hot cuisine] ++ [rating, price]`
    pub fn features(&self) -> Vec<f64> {
        let mut features = Vec::with_capacity(self.cuisine.len() + 2);
        features.extend_from_slice(&self.cuisine);
        features.push(self.rating);
        features.push(f64::from(self.price));
        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_flattens_restaurant_fields() {
        let visit = VisitRecord {
            restaurant: RestaurantRecord::new("Luigi's", "Pizza Place", 4.5, 2),
            liked: true,
            date_visited: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            dish: "Margherita".to_string(),
            personal_rating: 9,
        };

        let json = serde_json::to_value(&visit).unwrap();
        assert_eq!(json["Name"], "Luigi's");
        assert_eq!(json["Cuisine"], "Pizza Place");
        assert_eq!(json["Liked"], 1);
        assert_eq!(json["DateVisited"], "2024-05-01");
        assert_eq!(json["PersonalRating"], 9);

        let back: VisitRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, visit);
    }

    #[test]
    fn test_liked_accepts_bool_or_int() {
        let json = r#"{"Name":"A","Cuisine":"Thai","Rating":4.0,"Price":1,
            "Liked":false,"DateVisited":"2024-01-02","Dish":"Pad Thai","PersonalRating":6}"#;
        let visit: VisitRecord = serde_json::from_str(json).unwrap();
        assert!(!visit.liked);

        let bad = json.replace("false", "2");
        assert!(serde_json::from_str::<VisitRecord>(&bad).is_err());
    }

    #[test]
    fn test_training_example_features() {
        let example = TrainingExample {
            cuisine: vec![0.0, 1.0],
            rating: 4.2,
            price: 3,
            liked: true,
        };
        assert_eq!(example.features(), vec![0.0, 1.0, 4.2, 3.0]);
    }
}
