use crate::{
    models::{CanonicalCuisine, VisitRecord},
    services::cuisine::CuisineNormalizer,
};

/// Picks the user's best-loved dishes for a cuisine from their visit history
#[derive(Debug, Clone)]
pub struct DishSummarizer {
    normalizer: CuisineNormalizer,
    min_rating: u8,
}

impl Default for DishSummarizer {
    fn default() -> Self {
        Self::new(CuisineNormalizer::default(), 8)
    }
}

impl DishSummarizer {
    pub fn new(normalizer: CuisineNormalizer, min_rating: u8) -> Self {
        Self {
            normalizer,
            min_rating,
        }
    }

    /// Up to `limit` visits in `target` rated at least the minimum, best first.
    ///
    /// Equal ratings keep history order. An empty result is not an error; callers show a
    /// "try something new" message instead.
    pub fn top_dishes(
        &self,
        history: &[VisitRecord],
        target: &CanonicalCuisine,
        limit: usize,
    ) -> Vec<VisitRecord> {
        let mut matching: Vec<&VisitRecord> = history
            .iter()
            .filter(|visit| visit.personal_rating >= self.min_rating)
            .filter(|visit| self.normalizer.normalize(&visit.restaurant.cuisine) == *target)
            .collect();

        matching.sort_by(|a, b| b.personal_rating.cmp(&a.personal_rating));
        matching.into_iter().take(limit).cloned().collect()
    }
}
