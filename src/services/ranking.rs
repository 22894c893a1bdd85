use crate::{
    error::{AppError, AppResult},
    models::{RankedRecommendation, RestaurantRecord},
    services::{cuisine::CuisineNormalizer, encoder::CategoryEncoder, preference_model::PreferenceModel},
};

/// Scores candidate restaurants with a fitted model and orders them by confidence
#[derive(Debug, Clone, Default)]
pub struct RankingEngine {
    normalizer: CuisineNormalizer,
}

impl RankingEngine {
    pub fn new(normalizer: CuisineNormalizer) -> Self {
        Self { normalizer }
    }

    /// Ranks `candidates`, highest confidence first.
    ///
    /// Equal confidences keep their input order. The candidate slice is never modified;
    /// every result carries its own copy of the record.
    pub fn rank(
        &self,
        candidates: &[RestaurantRecord],
        model: &PreferenceModel,
        encoder: &CategoryEncoder,
    ) -> AppResult<Vec<RankedRecommendation>> {
        if !model.is_trained() {
            return Err(AppError::ModelNotTrained);
        }

        let mut ranked = candidates
            .iter()
            .map(|restaurant| {
                let canonical_cuisine = self.normalizer.normalize(&restaurant.cuisine);
                let features =
                    encoder.features(&canonical_cuisine, restaurant.rating, restaurant.price)?;
                let confidence = model.predict_probability(&features)?;

                Ok(RankedRecommendation {
                    restaurant: restaurant.clone(),
                    canonical_cuisine,
                    predicted_like: confidence >= 0.5,
                    confidence,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        // Vec::sort_by is stable
        ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        tracing::debug!(candidates = ranked.len(), "Candidates ranked");

        Ok(ranked)
    }
}
