use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        // outermost, so the trace span can see the request id
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Restaurants
        .route(
            "/restaurants",
            get(handlers::list_restaurants)
                .post(handlers::add_restaurant)
                .delete(handlers::clear_restaurants),
        )
        .route("/restaurants/:index", delete(handlers::remove_restaurant))
        // Visit history
        .route("/history", get(handlers::list_history))
        .route("/visits", post(handlers::record_visit))
        // Recommendation
        .route("/recommendation", get(handlers::recommend))
        .route("/insights", get(handlers::insights))
}
