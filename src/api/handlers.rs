use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{CanonicalCuisine, Insights, RankedRecommendation, RestaurantRecord, VisitRecord},
    services::insights,
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct CreateRestaurantRequest {
    pub name: String,
    pub cuisine: String,
    pub rating: f64,
    pub price: u8,
}

#[derive(Debug, Deserialize)]
pub struct RecordVisitRequest {
    /// Name of a saved restaurant, matched case-insensitively
    pub restaurant: String,
    /// Required only when the restaurant is not saved yet
    pub cuisine: Option<String>,
    pub rating: Option<f64>,
    pub price: Option<u8>,
    pub dish: String,
    pub personal_rating: u8,
    #[serde(with = "crate::models::flag")]
    pub liked: bool,
    /// Defaults to today
    pub date_visited: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct DishSuggestion {
    pub dish: String,
    pub personal_rating: u8,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub restaurant: String,
    pub cuisine: CanonicalCuisine,
    pub confidence: f64,
    pub dishes: Vec<DishSuggestion>,
    /// Set when no dish in the top cuisine is rated highly enough
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub ranked: Vec<RankedRecommendation>,
}

// Validation

fn validate_restaurant(name: &str, rating: f64, price: u8) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Restaurant name must not be empty".to_string(),
        ));
    }
    if !(0.0..=5.0).contains(&rating) {
        return Err(AppError::InvalidInput(format!(
            "Rating must be between 0 and 5, got {}",
            rating
        )));
    }
    if !(1..=4).contains(&price) {
        return Err(AppError::InvalidInput(format!(
            "Price level must be between 1 and 4, got {}",
            price
        )));
    }
    Ok(())
}

fn validate_dish(dish: &str, personal_rating: u8) -> AppResult<()> {
    if dish.trim().is_empty() {
        return Err(AppError::InvalidInput("Dish must not be empty".to_string()));
    }
    if !(1..=10).contains(&personal_rating) {
        return Err(AppError::InvalidInput(format!(
            "Dish rating must be between 1 and 10, got {}",
            personal_rating
        )));
    }
    Ok(())
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// List saved restaurants
pub async fn list_restaurants(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<RestaurantRecord>>> {
    Ok(Json(state.store.restaurants().await?))
}

/// Save a new restaurant with its cuisine normalized
pub async fn add_restaurant(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<CreateRestaurantRequest>,
) -> AppResult<(StatusCode, Json<RestaurantRecord>)> {
    validate_restaurant(&request.name, request.rating, request.price)?;

    let cuisine = state.recommender.normalizer().normalize(&request.cuisine);
    let restaurant = RestaurantRecord::new(
        request.name.trim(),
        cuisine.as_str(),
        request.rating,
        request.price,
    );
    state.store.add_restaurant(restaurant.clone()).await?;

    tracing::info!(
        request_id = %request_id,
        name = %restaurant.name,
        cuisine = %restaurant.cuisine,
        "Restaurant added"
    );

    Ok((StatusCode::CREATED, Json(restaurant)))
}

/// Remove one restaurant by 0-based position
pub async fn remove_restaurant(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(index): Path<usize>,
) -> AppResult<Json<RestaurantRecord>> {
    let removed = state.store.remove_restaurant(index).await?;
    tracing::info!(request_id = %request_id, index, name = %removed.name, "Restaurant removed");
    Ok(Json(removed))
}

/// Remove every saved restaurant
pub async fn clear_restaurants(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<StatusCode> {
    state.store.clear_restaurants().await?;
    tracing::info!(request_id = %request_id, "Restaurant list cleared");
    Ok(StatusCode::NO_CONTENT)
}

/// Full visit history
pub async fn list_history(State(state): State<AppState>) -> AppResult<Json<Vec<VisitRecord>>> {
    Ok(Json(state.store.history().await?))
}

/// Rate a dish eaten at a restaurant
///
/// Unknown restaurants are added to the restaurant table first, which requires
/// cuisine, rating and price in the request.
pub async fn record_visit(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecordVisitRequest>,
) -> AppResult<(StatusCode, Json<VisitRecord>)> {
    validate_dish(&request.dish, request.personal_rating)?;

    let wanted = request.restaurant.trim().to_lowercase();
    let saved = state
        .store
        .restaurants()
        .await?
        .into_iter()
        .find(|r| r.name.to_lowercase() == wanted);

    let restaurant = match saved {
        Some(restaurant) => restaurant,
        None => {
            let (Some(cuisine), Some(rating), Some(price)) =
                (request.cuisine.as_deref(), request.rating, request.price)
            else {
                tracing::warn!(
                    request_id = %request_id,
                    restaurant = %request.restaurant,
                    "Visit for unknown restaurant without details"
                );
                return Err(AppError::InvalidInput(format!(
                    "Restaurant '{}' is not saved; provide cuisine, rating and price",
                    request.restaurant.trim()
                )));
            };
            validate_restaurant(&request.restaurant, rating, price)?;

            let cuisine = state.recommender.normalizer().normalize(cuisine);
            let restaurant =
                RestaurantRecord::new(request.restaurant.trim(), cuisine.as_str(), rating, price);
            state.store.add_restaurant(restaurant.clone()).await?;
            tracing::info!(
                request_id = %request_id,
                name = %restaurant.name,
                "Restaurant added from visit"
            );
            restaurant
        }
    };

    let cuisine = state.recommender.normalizer().normalize(&restaurant.cuisine);
    let visit = VisitRecord {
        restaurant: RestaurantRecord {
            cuisine: cuisine.as_str().to_string(),
            ..restaurant
        },
        liked: request.liked,
        date_visited: request
            .date_visited
            .unwrap_or_else(|| Local::now().date_naive()),
        dish: request.dish.trim().to_string(),
        personal_rating: request.personal_rating,
    };
    state.store.append_visit(visit.clone()).await?;

    tracing::info!(
        request_id = %request_id,
        restaurant = %visit.restaurant.name,
        dish = %visit.dish,
        personal_rating = visit.personal_rating,
        "Visit recorded"
    );

    Ok((StatusCode::CREATED, Json(visit)))
}

/// Where to eat next and what to order there
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<RecommendationResponse>> {
    let restaurants = state.store.restaurants().await?;
    let history = state.store.history().await?;

    tracing::info!(
        request_id = %request_id,
        restaurants = restaurants.len(),
        history = history.len(),
        "Processing recommendation request"
    );

    let recommendation = state.recommender.recommend(&restaurants, &history)?;
    state
        .store
        .export_recommendations(&recommendation.ranked)
        .await?;

    let note = recommendation.dishes.is_empty().then(|| {
        format!(
            "No high-rated dishes yet for {}. Try something new!",
            recommendation.top_cuisine
        )
    });
    let dishes = recommendation
        .dishes
        .into_iter()
        .map(|visit| DishSuggestion {
            dish: visit.dish,
            personal_rating: visit.personal_rating,
        })
        .collect();

    Ok(Json(RecommendationResponse {
        restaurant: recommendation.top.restaurant.name,
        cuisine: recommendation.top_cuisine,
        confidence: recommendation.top.confidence,
        dishes,
        note,
        ranked: recommendation.ranked,
    }))
}

/// Rating aggregates over the history
pub async fn insights(State(state): State<AppState>) -> AppResult<Json<Insights>> {
    let history = state.store.history().await?;
    Ok(Json(insights::summarize(
        &history,
        state.recommender.normalizer(),
    )))
}
