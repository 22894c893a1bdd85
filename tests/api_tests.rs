use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use bite_api::{
    api::{create_router, AppState},
    services::Recommender,
    store::FileTableStore,
};

fn create_test_server() -> TestServer {
    let state = AppState::in_memory();
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn create_file_server(dir: &std::path::Path) -> TestServer {
    let state = AppState::new(Arc::new(FileTableStore::new(dir)), Recommender::default());
    TestServer::new(create_router(state)).unwrap()
}

async fn add_restaurant(server: &TestServer, name: &str, cuisine: &str, rating: f64, price: u8) {
    server
        .post("/api/v1/restaurants")
        .json(&json!({ "name": name, "cuisine": cuisine, "rating": rating, "price": price }))
        .await
        .assert_status(StatusCode::CREATED);
}

async fn rate(server: &TestServer, restaurant: &str, dish: &str, personal_rating: u8, liked: u8) {
    server
        .post("/api/v1/visits")
        .json(&json!({
            "restaurant": restaurant,
            "dish": dish,
            "personal_rating": personal_rating,
            "liked": liked,
            "date_visited": "2024-05-01"
        }))
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_header_echoed() {
    let server = create_test_server();
    let id = "6f1c2a8e-4b7d-4c1e-9f3a-2d5e8b0c7a91";
    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static(id),
        )
        .await;
    response.assert_status_ok();
    assert_eq!(response.header("x-request-id"), id);
}

#[tokio::test]
async fn test_add_list_remove_restaurants() {
    let server = create_test_server();
    add_restaurant(&server, "Luigi's", "Pizza Place", 4.5, 2).await;
    add_restaurant(&server, "Koi", "sushi bar", 4.1, 3).await;

    let response = server.get("/api/v1/restaurants").await;
    response.assert_status_ok();
    let rows: Vec<Value> = response.json();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["Cuisine"], "Italian");
    assert_eq!(rows[1]["Cuisine"], "Sushi");

    let response = server.delete("/api/v1/restaurants/0").await;
    response.assert_status_ok();
    let removed: Value = response.json();
    assert_eq!(removed["Name"], "Luigi's");

    let response = server.delete("/api/v1/restaurants/7").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("position 7"));

    server
        .delete("/api/v1/restaurants")
        .await
        .assert_status(StatusCode::NO_CONTENT);
    let rows: Vec<Value> = server.get("/api/v1/restaurants").await.json();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_invalid_restaurant_rejected() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/restaurants")
        .json(&json!({ "name": "Too Fancy", "cuisine": "French", "rating": 4.9, "price": 5 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Price level"));
}

#[tokio::test]
async fn test_visit_for_new_restaurant_saves_both_tables() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/visits")
        .json(&json!({
            "restaurant": "Kebab King",
            "cuisine": "Kebab House",
            "rating": 4.0,
            "price": 1,
            "dish": "Lamb Wrap",
            "personal_rating": 8,
            "liked": 1
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let visit: Value = response.json();
    assert_eq!(visit["Cuisine"], "Middle Eastern");
    assert_eq!(visit["Liked"], 1);
    assert_eq!(visit["PersonalRating"], 8);

    let restaurants: Vec<Value> = server.get("/api/v1/restaurants").await.json();
    assert_eq!(restaurants.len(), 1);
    let history: Vec<Value> = server.get("/api/v1/history").await.json();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["Dish"], "Lamb Wrap");
}

#[tokio::test]
async fn test_recommendation_needs_history() {
    let server = create_test_server();
    add_restaurant(&server, "Luigi's", "Pizza", 4.5, 2).await;
    rate(&server, "Luigi's", "Margherita", 9, 1).await;

    let response = server.get("/api/v1/recommendation").await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("need at least 3"));
}

#[tokio::test]
async fn test_recommendation_flow() {
    let server = create_test_server();
    add_restaurant(&server, "Luigi's", "Pizza Place", 4.5, 2).await;
    add_restaurant(&server, "Koi", "Sushi Bar", 4.0, 3).await;
    add_restaurant(&server, "Smash", "Burger Joint", 3.5, 1).await;

    rate(&server, "Luigi's", "Margherita", 9, 1).await;
    rate(&server, "luigi's", "Tiramisu", 8, 1).await;
    rate(&server, "Koi", "California Roll", 4, 0).await;
    rate(&server, "Smash", "Double Smash", 5, 0).await;

    let response = server.get("/api/v1/recommendation").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["restaurant"], "Luigi's");
    assert_eq!(body["cuisine"], "Italian");
    assert!(body.get("note").is_none());

    let dishes: Vec<&str> = body["dishes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["dish"].as_str().unwrap())
        .collect();
    assert_eq!(dishes, vec!["Margherita", "Tiramisu"]);

    let ranked = body["ranked"].as_array().unwrap();
    assert_eq!(ranked.len(), 3);
    let confidences: Vec<f64> = ranked
        .iter()
        .map(|r| r["Confidence"].as_f64().unwrap())
        .collect();
    assert!(confidences.windows(2).all(|w| w[0] >= w[1]));
    assert!(confidences.iter().all(|c| (0.0..=1.0).contains(c)));
    assert_eq!(ranked[0]["Predicted_Like"], 1);
    assert_eq!(ranked[0]["CanonicalCuisine"], "Italian");

    // same tables, same answer
    let again: Value = server.get("/api/v1/recommendation").await.json();
    assert_eq!(again, body);
}

#[tokio::test]
async fn test_insights() {
    let server = create_test_server();
    add_restaurant(&server, "Luigi's", "Pizza Place", 4.5, 2).await;
    add_restaurant(&server, "Koi", "Sushi Bar", 4.0, 3).await;
    rate(&server, "Luigi's", "Margherita", 9, 1).await;
    rate(&server, "Koi", "Nigiri", 6, 0).await;

    let response = server.get("/api/v1/insights").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["average_rating_by_cuisine"][0]["cuisine"], "Italian");
    assert_eq!(body["liked_by_cuisine"].as_array().unwrap().len(), 1);
    assert_eq!(body["rating_timeline"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_file_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let first = create_file_server(dir.path());
    add_restaurant(&first, "Bangkok Garden", "Thai", 4.3, 2).await;
    rate(&first, "Bangkok Garden", "Green Curry", 9, 1).await;

    let second = create_file_server(dir.path());
    let history: Vec<Value> = second.get("/api/v1/history").await.json();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["Cuisine"], "Thai");
}

#[tokio::test]
async fn test_recommendation_exports_ranked_table() {
    let dir = tempfile::tempdir().unwrap();
    let server = create_file_server(dir.path());
    add_restaurant(&server, "Bella", "Pizza Place", 4.5, 2).await;
    add_restaurant(&server, "Koi", "Sushi Bar", 4.0, 3).await;
    rate(&server, "Bella", "Margherita", 9, 1).await;
    rate(&server, "Bella", "Calzone", 8, 1).await;
    rate(&server, "Koi", "Maki", 4, 0).await;

    server.get("/api/v1/recommendation").await.assert_status_ok();

    let exported = std::fs::read_to_string(dir.path().join("recommendations.csv")).unwrap();
    let mut lines = exported.lines();
    assert_eq!(
        lines.next(),
        Some("Name,Cuisine,Rating,Price,Predicted_Like,Confidence")
    );
    assert!(lines.next().unwrap().starts_with("Bella,Italian,4.5,2,1,"));
    assert_eq!(lines.count(), 1);
}
