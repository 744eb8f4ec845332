use serde::{Deserialize, Serialize};

use crate::db::models::{Ingredient, Recipe};

/// Body of POST /api/ingredients
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIngredientRequest {
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Body of POST /api/ingredients/delete
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteIngredientsRequest {
    #[serde(default)]
    pub ids: Vec<i64>,
}

/// Body of POST /api/recipes
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecipeRequest {
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub ingredient_ids: Vec<i64>,
}

/// Query of GET /api/recipes/find, e.g. `?ingredients=1,2,3`
#[derive(Debug, Clone, Deserialize)]
pub struct FindParams {
    #[serde(default)]
    pub ingredients: String,
}

/// Ingredient list response
#[derive(Debug, Clone, Serialize)]
pub struct IngredientsResponse {
    pub ingredients: Vec<Ingredient>,
}

/// Recipe list response
#[derive(Debug, Clone, Serialize)]
pub struct RecipesResponse {
    pub recipes: Vec<Recipe>,
}

/// Recipes found for an ingredient selection
#[derive(Debug, Clone, Serialize)]
pub struct FindResponse {
    pub selected: Vec<i64>,
    pub recipes: Vec<Recipe>,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub database: String,
}
