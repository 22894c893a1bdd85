use std::collections::BTreeMap;

use crate::{
    models::{CanonicalCuisine, CuisineAverage, CuisineCount, Insights, RatingPoint, VisitRecord},
    services::cuisine::CuisineNormalizer,
};

/// Summarizes the visit history per canonical cuisine and over time
pub fn summarize(history: &[VisitRecord], normalizer: &CuisineNormalizer) -> Insights {
    let cuisines: Vec<CanonicalCuisine> = history
        .iter()
        .map(|visit| normalizer.normalize(&visit.restaurant.cuisine))
        .collect();

    let mut totals: BTreeMap<&CanonicalCuisine, (u32, usize)> = BTreeMap::new();
    let mut liked: BTreeMap<&CanonicalCuisine, usize> = BTreeMap::new();

    for (visit, cuisine) in history.iter().zip(&cuisines) {
        let entry = totals.entry(cuisine).or_default();
        entry.0 += u32::from(visit.personal_rating);
        entry.1 += 1;

        if visit.liked {
            *liked.entry(cuisine).or_default() += 1;
        }
    }

    // BTreeMap iteration is alphabetical, so stable sorts leave ties in name order
    let mut average_rating_by_cuisine: Vec<CuisineAverage> = totals
        .into_iter()
        .map(|(cuisine, (sum, visits))| CuisineAverage {
            cuisine: cuisine.clone(),
            average_rating: f64::from(sum) / visits as f64,
            visits,
        })
        .collect();
    average_rating_by_cuisine.sort_by(|a, b| b.average_rating.total_cmp(&a.average_rating));

    let mut liked_by_cuisine: Vec<CuisineCount> = liked
        .into_iter()
        .map(|(cuisine, liked)| CuisineCount {
            cuisine: cuisine.clone(),
            liked,
        })
        .collect();
    liked_by_cuisine.sort_by(|a, b| b.liked.cmp(&a.liked));

    let mut rating_timeline: Vec<RatingPoint> = history
        .iter()
        .zip(cuisines)
        .map(|(visit, cuisine)| RatingPoint {
            date: visit.date_visited,
            dish: visit.dish.clone(),
            cuisine,
            personal_rating: visit.personal_rating,
        })
        .collect();
    rating_timeline.sort_by_key(|point| point.date);

    Insights {
        average_rating_by_cuisine,
        liked_by_cuisine,
        rating_timeline,
    }
}
