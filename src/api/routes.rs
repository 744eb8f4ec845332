use axum::http::{header, Method};
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::api::handlers::{self as api_handlers, AppState};
use crate::config::Settings;

/// Create the router with all endpoints
pub fn create_router(state: AppState, settings: &Settings) -> Router {
    let api_routes = Router::new()
        // Ingredients
        .route(
            "/ingredients",
            get(api_handlers::list_ingredients).post(api_handlers::create_ingredient),
        )
        .route("/ingredients/delete", post(api_handlers::delete_ingredients))
        .route(
            "/ingredients/:id",
            get(api_handlers::get_ingredient).delete(api_handlers::delete_ingredient),
        )
        // Recipes
        .route(
            "/recipes",
            get(api_handlers::list_recipes).post(api_handlers::create_recipe),
        )
        .route("/recipes/find", get(api_handlers::find_recipes))
        .route("/recipes/:id", get(api_handlers::get_recipe))
        // Stats
        .route("/stats", get(api_handlers::get_stats))
        .with_state(state.clone());

    // Health check routes
    let health_routes = Router::new()
        .route("/health", get(api_handlers::health_check))
        .route("/ready", get(api_handlers::readiness_check))
        .with_state(state);

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(RequestBodyLimitLayer::new(
            settings.server.max_request_body_size,
        ))
        .layer(
            // CORS - a local front end may run on another port
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .allow_origin(tower_http::cors::Any)
                .max_age(Duration::from_secs(3600)),
        )
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::{DatabaseConfig, ServerConfig};

    async fn create_test_app() -> Router {
        let pool = crate::db::open("sqlite::memory:").await.unwrap();

        let settings = Settings {
            database: DatabaseConfig::in_memory(),
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                max_request_body_size: 1048576,
            },
        };

        let state = AppState::new(pool);
        create_router(state, &settings)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create_ingredient(app: &Router, name: &str) -> i64 {
        let response = send(
            app,
            Method::POST,
            "/api/ingredients",
            Some(json!({ "name": name })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_health_routes_exist() {
        let app = create_test_app().await;

        let response = send(&app, Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, Method::GET, "/ready", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["ready"], json!(true));
    }

    #[tokio::test]
    async fn test_duplicate_ingredient_conflicts() {
        let app = create_test_app().await;
        create_ingredient(&app, "Salt").await;

        let response = send(
            &app,
            Method::POST,
            "/api/ingredients",
            Some(json!({ "name": "Salt" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            json_body(response).await["error"],
            json!("Ingredient 'Salt' already exists")
        );
    }

    #[tokio::test]
    async fn test_recipe_lifecycle() {
        let app = create_test_app().await;
        let a = create_ingredient(&app, "Beef").await;
        let b = create_ingredient(&app, "Carrot").await;
        let c = create_ingredient(&app, "Lettuce").await;

        let response = send(
            &app,
            Method::POST,
            "/api/recipes",
            Some(json!({ "name": "Stew", "image": "stew.png", "ingredient_ids": [a, b] })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let stew_id = json_body(response).await["id"].as_i64().unwrap();

        let response = send(
            &app,
            Method::GET,
            &format!("/api/recipes/find?ingredients={b}"),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["recipes"].as_array().unwrap().len(), 1);
        assert_eq!(body["recipes"][0]["name"], json!("Stew"));
        assert_eq!(body["recipes"][0]["image"], json!("stew.png"));

        let response = send(
            &app,
            Method::GET,
            &format!("/api/recipes/find?ingredients={c}"),
            None,
        )
        .await;
        let body = json_body(response).await;
        assert!(body["recipes"].as_array().unwrap().is_empty());

        let response = send(&app, Method::GET, &format!("/api/recipes/{stew_id}"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["name"], json!("Stew"));
        assert_eq!(body["ingredients"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_selection_errors() {
        let app = create_test_app().await;

        let response = send(&app, Method::GET, "/api/recipes/find?ingredients=", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &app,
            Method::POST,
            "/api/recipes",
            Some(json!({ "name": "Soup", "ingredient_ids": [] })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &app,
            Method::POST,
            "/api/recipes",
            Some(json!({ "name": "Soup", "ingredient_ids": [77] })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let too_many: Vec<i64> = (1..=40_000).collect();
        let response = send(
            &app,
            Method::POST,
            "/api/recipes",
            Some(json!({ "name": "Everything", "ingredient_ids": too_many })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_endpoints() {
        let app = create_test_app().await;
        let salt = create_ingredient(&app, "Salt").await;
        let pepper = create_ingredient(&app, "Pepper").await;

        let response = send(
            &app,
            Method::POST,
            "/api/ingredients/delete",
            Some(json!({ "ids": [salt, 500] })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let report = json_body(response).await;
        assert_eq!(report["deleted"], json!([salt]));
        assert_eq!(report["missing"], json!([500]));

        let response = send(
            &app,
            Method::DELETE,
            &format!("/api/ingredients/{pepper}"),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        // Deleting an id that is already gone is a no-op
        let response = send(
            &app,
            Method::DELETE,
            &format!("/api/ingredients/{pepper}"),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&app, Method::GET, "/api/ingredients/31337", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, Method::GET, "/api/stats", None).await;
        assert_eq!(json_body(response).await["total_ingredients"], json!(0));
    }
}
