use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::db::models::{
    CatalogStats, DeleteReport, Ingredient, NewIngredient, NewRecipe, Recipe,
    RecipeWithIngredients,
};
use crate::utils::validation::{distinct_ids, parse_id_list};
use crate::{api::models::*, db, Result};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: db::DbPool,
    /// Held for the duration of every catalog write
    pub writer: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(pool: db::DbPool) -> Self {
        Self {
            pool,
            writer: Arc::new(Mutex::new(())),
        }
    }
}

/// GET /api/ingredients - List ingredients by name
pub async fn list_ingredients(State(state): State<AppState>) -> Result<Json<IngredientsResponse>> {
    debug!("List ingredients request");

    let ingredients = db::ingredients::list_ingredients(&state.pool).await?;
    Ok(Json(IngredientsResponse { ingredients }))
}

/// POST /api/ingredients - Add an ingredient
pub async fn create_ingredient(
    State(state): State<AppState>,
    Json(request): Json<CreateIngredientRequest>,
) -> Result<(StatusCode, Json<Ingredient>)> {
    debug!("Create ingredient request: {}", request.name);

    let _guard = state.writer.lock().await;
    let ingredient = db::ingredients::add_ingredient(
        &state.pool,
        &NewIngredient {
            name: request.name,
            image: request.image,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ingredient)))
}

/// GET /api/ingredients/:id - Get one ingredient
pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Ingredient>> {
    debug!("Get ingredient request: {}", id);

    let ingredient = db::ingredients::get_ingredient(&state.pool, id).await?;
    Ok(Json(ingredient))
}

/// DELETE /api/ingredients/:id - Delete one ingredient
///
/// Deleting an id that does not exist is a no-op and also answers 204.
pub async fn delete_ingredient(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    debug!("Delete ingredient request: {}", id);

    let _guard = state.writer.lock().await;
    db::ingredients::delete_ingredient(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/ingredients/delete - Delete a selection of ingredients
pub async fn delete_ingredients(
    State(state): State<AppState>,
    Json(request): Json<DeleteIngredientsRequest>,
) -> Result<Json<DeleteReport>> {
    debug!("Bulk delete request: {:?}", request.ids);

    let _guard = state.writer.lock().await;
    let report = db::ingredients::delete_ingredients(&state.pool, &request.ids).await?;
    Ok(Json(report))
}

/// GET /api/recipes - List recipes by name
pub async fn list_recipes(State(state): State<AppState>) -> Result<Json<RecipesResponse>> {
    debug!("List recipes request");

    let recipes = db::recipes::list_recipes(&state.pool).await?;
    Ok(Json(RecipesResponse { recipes }))
}

/// POST /api/recipes - Create a recipe from selected ingredients
pub async fn create_recipe(
    State(state): State<AppState>,
    Json(request): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<Recipe>)> {
    debug!(
        "Create recipe request: {} with {:?}",
        request.name, request.ingredient_ids
    );

    let _guard = state.writer.lock().await;
    let recipe = db::recipes::add_recipe(
        &state.pool,
        &NewRecipe {
            name: request.name,
            image: request.image,
            ingredient_ids: request.ingredient_ids,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(recipe)))
}

/// GET /api/recipes/:id - Recipe with its ingredients
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RecipeWithIngredients>> {
    debug!("Get recipe request: {}", id);

    let recipe = db::recipes::get_recipe_with_ingredients(&state.pool, id).await?;
    Ok(Json(recipe))
}

/// GET /api/recipes/find?ingredients=1,2 - Recipes using any selected ingredient
pub async fn find_recipes(
    State(state): State<AppState>,
    Query(params): Query<FindParams>,
) -> Result<Json<FindResponse>> {
    debug!("Find recipes request: {:?}", params);

    let selected = distinct_ids(&parse_id_list(&params.ingredients)?);
    let recipes = db::matching::find_recipes(&state.pool, &selected).await?;

    Ok(Json(FindResponse { selected, recipes }))
}

/// GET /api/stats - Catalog statistics
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<CatalogStats>> {
    debug!("Get stats request");

    let stats = db::recipes::catalog_stats(&state.pool).await?;
    Ok(Json(stats))
}

/// GET /health - Health check endpoint
pub async fn health_check() -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}

/// GET /ready - Readiness check endpoint
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<ReadinessResponse>> {
    let db_healthy = sqlx::query("SELECT 1").fetch_one(&state.pool).await.is_ok();

    Ok(Json(ReadinessResponse {
        ready: db_healthy,
        database: if db_healthy { "ok" } else { "error" }.to_string(),
    }))
}
