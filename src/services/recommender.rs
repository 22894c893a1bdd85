use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{CanonicalCuisine, Recommendation, RestaurantRecord, TrainingExample, VisitRecord},
    services::{
        cuisine::CuisineNormalizer,
        dishes::DishSummarizer,
        encoder::CategoryEncoder,
        preference_model::{FitOptions, PreferenceModel},
        ranking::RankingEngine,
    },
};

/// End-to-end recommendation pipeline: fit on history, rank restaurants, pick dishes.
///
/// Holds configuration only. Every call to [`Recommender::recommend`] fits its own encoder
/// and model and drops them afterwards, so one instance can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct Recommender {
    normalizer: CuisineNormalizer,
    fit_options: FitOptions,
    min_history: usize,
    dish_limit: usize,
    dish_min_rating: u8,
}

impl Default for Recommender {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl Recommender {
    pub fn from_config(config: &Config) -> Self {
        Self {
            normalizer: CuisineNormalizer::default(),
            fit_options: config.fit_options(),
            min_history: config.min_history,
            dish_limit: config.dish_limit,
            dish_min_rating: config.dish_min_rating,
        }
    }

    pub fn normalizer(&self) -> &CuisineNormalizer {
        &self.normalizer
    }

    /// Fits a fresh encoder and preference model on the visit history
    pub fn train(&self, history: &[VisitRecord]) -> AppResult<(CategoryEncoder, PreferenceModel)> {
        let cuisines: Vec<CanonicalCuisine> = history
            .iter()
            .map(|visit| self.normalizer.normalize(&visit.restaurant.cuisine))
            .collect();
        let encoder = CategoryEncoder::fitted(&cuisines);

        let examples = history
            .iter()
            .zip(&cuisines)
            .map(|(visit, cuisine)| {
                Ok(TrainingExample {
                    cuisine: encoder.transform(cuisine)?,
                    rating: visit.restaurant.rating,
                    price: visit.restaurant.price,
                    liked: visit.liked,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        let mut model = PreferenceModel::new(self.fit_options);
        model.fit(&examples)?;

        Ok((encoder, model))
    }

    pub fn recommend(
        &self,
        restaurants: &[RestaurantRecord],
        history: &[VisitRecord],
    ) -> AppResult<Recommendation> {
        if history.len() < self.min_history.max(1) {
            return Err(AppError::InsufficientHistory {
                have: history.len(),
                need: self.min_history.max(1),
            });
        }
        if restaurants.is_empty() {
            return Err(AppError::InvalidInput(
                "Add at least one restaurant to get a recommendation".to_string(),
            ));
        }

        tracing::info!(
            history = history.len(),
            candidates = restaurants.len(),
            "Building recommendation"
        );

        let (encoder, model) = self.train(history)?;
        let ranked = RankingEngine::new(self.normalizer.clone()).rank(restaurants, &model, &encoder)?;

        let top = ranked
            .first()
            .cloned()
            .ok_or_else(|| AppError::Internal("Ranking produced no results".to_string()))?;
        let top_cuisine = top.canonical_cuisine.clone();

        let dishes = DishSummarizer::new(self.normalizer.clone(), self.dish_min_rating)
            .top_dishes(history, &top_cuisine, self.dish_limit);

        tracing::info!(
            restaurant = %top.restaurant.name,
            cuisine = %top_cuisine,
            confidence = top.confidence,
            dishes = dishes.len(),
            "Recommendation ready"
        );

        Ok(Recommendation {
            top,
            top_cuisine,
            dishes,
            ranked,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn visit(cuisine: &str, rating: f64, price: u8, liked: bool, dish: &str, personal: u8) -> VisitRecord {
        VisitRecord {
            restaurant: RestaurantRecord::new("Visited", cuisine, rating, price),
            liked,
            date_visited: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            dish: dish.to_string(),
            personal_rating: personal,
        }
    }

    fn lenient() -> Recommender {
        let config = Config {
            min_history: 1,
            ..Config::default()
        };
        Recommender::from_config(&config)
    }

    #[test]
    fn test_liked_cuisine_ranks_first() {
        let history = vec![
            visit("Pizza Place", 4.5, 2, true, "Margherita", 9),
            visit("Sushi Bar", 4.0, 3, false, "California Roll", 5),
        ];
        let candidates = vec![
            RestaurantRecord::new("A", "Italian Bistro", 4.5, 2),
            RestaurantRecord::new("B", "Sushi House", 4.0, 3),
        ];

        let rec = lenient().recommend(&candidates, &history).unwrap();

        assert_eq!(rec.ranked.len(), 2);
        assert_eq!(rec.ranked[0].restaurant.name, "A");
        assert!(rec.ranked[0].confidence > rec.ranked[1].confidence);
        assert_eq!(rec.top_cuisine, "Italian");
        assert_eq!(rec.dishes.len(), 1);
        assert_eq!(rec.dishes[0].dish, "Margherita");
    }

    #[test]
    fn test_requires_minimum_history() {
        let history = vec![visit("Thai", 4.0, 2, true, "Pad Thai", 9)];
        let candidates = vec![RestaurantRecord::new("A", "Thai", 4.0, 2)];

        let result = Recommender::default().recommend(&candidates, &history);
        assert!(matches!(
            result,
            Err(AppError::InsufficientHistory { have: 1, need: 3 })
        ));
    }

    #[test]
    fn test_requires_candidates() {
        let history = vec![visit("Thai", 4.0, 2, true, "Pad Thai", 9)];
        assert!(matches!(
            lenient().recommend(&[], &history),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_dishes_when_top_cuisine_unrated() {
        let history = vec![
            visit("Burger Joint", 3.0, 1, false, "Smash Burger", 4),
            visit("Thai", 4.5, 2, true, "Green Curry", 7),
        ];
        let candidates = vec![RestaurantRecord::new("Bangkok", "Thai Kitchen", 4.5, 2)];

        let rec = lenient().recommend(&candidates, &history).unwrap();
        assert_eq!(rec.top.restaurant.name, "Bangkok");
        assert!(rec.dishes.is_empty());
    }

    #[test]
    fn test_train_builds_encoder_from_history() {
        let history = vec![
            visit("Doner Kebab", 4.0, 1, true, "Wrap", 8),
            visit("Sushi", 4.0, 3, false, "Maki", 5),
        ];
        let (encoder, model) = lenient().train(&history).unwrap();
        let names: Vec<&str> = encoder
            .categories()
            .unwrap()
            .iter()
            .map(CanonicalCuisine::as_str)
            .collect();
        assert_eq!(names, vec!["Middle Eastern", "Sushi"]);
        assert_eq!(model.n_features().unwrap(), 4);
    }
}
