use crate::db::{ingredients, models::*, DbPool};
use crate::error::{Error, Result};
use crate::utils::validation::{normalize_image, selection, validate_name};
use tracing::info;

/// Create a recipe together with its ingredient links
///
/// The recipe row and every link are committed in one transaction; any
/// failure leaves the catalog untouched.
pub async fn add_recipe(pool: &DbPool, new_recipe: &NewRecipe) -> Result<Recipe> {
    let ingredient_ids = selection(&new_recipe.ingredient_ids)?;
    validate_name("Recipe", &new_recipe.name)?;
    let image = normalize_image(new_recipe.image.as_deref());

    let mut tx = pool.begin().await?;

    let missing = ingredients::find_missing_ingredients(&mut *tx, &ingredient_ids).await?;
    if !missing.is_empty() {
        return Err(Error::UnknownIngredient(missing));
    }

    let recipe = sqlx::query_as::<_, Recipe>(
        "INSERT INTO recipes (name, image) VALUES (?, ?) RETURNING id, name, image",
    )
    .bind(&new_recipe.name)
    .bind(&image)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| Error::from_insert(e, "Recipe", &new_recipe.name))?;

    for ingredient_id in &ingredient_ids {
        sqlx::query("INSERT INTO recipe_ingredient (recipe_id, ingredient_id) VALUES (?, ?)")
            .bind(recipe.id)
            .bind(ingredient_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    info!(
        "Added recipe {} ({}) with {} ingredients",
        recipe.id,
        recipe.name,
        ingredient_ids.len()
    );
    Ok(recipe)
}

/// Get recipe by ID
pub async fn get_recipe(pool: &DbPool, recipe_id: i64) -> Result<Recipe> {
    let recipe = sqlx::query_as::<_, Recipe>(
        "SELECT id, name, NULLIF(image, '') AS image FROM recipes WHERE id = ?",
    )
    .bind(recipe_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Recipe {recipe_id} not found")))?;

    Ok(recipe)
}

/// Get recipe with the ingredients it requires
pub async fn get_recipe_with_ingredients(
    pool: &DbPool,
    recipe_id: i64,
) -> Result<RecipeWithIngredients> {
    let recipe = get_recipe(pool, recipe_id).await?;
    let ingredients = ingredients::get_ingredients_for_recipe(pool, recipe_id).await?;

    Ok(RecipeWithIngredients {
        recipe,
        ingredients,
    })
}

/// List all recipes ordered by name
pub async fn list_recipes(pool: &DbPool) -> Result<Vec<Recipe>> {
    let recipes = sqlx::query_as::<_, Recipe>(
        "SELECT id, name, NULLIF(image, '') AS image FROM recipes ORDER BY name, id",
    )
    .fetch_all(pool)
    .await?;

    Ok(recipes)
}

/// Count all recipes
pub async fn count_recipes(pool: &DbPool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipes")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

/// Count recipe/ingredient links
pub async fn count_associations(pool: &DbPool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipe_ingredient")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

/// Catalog-wide counts
pub async fn catalog_stats(pool: &DbPool) -> Result<CatalogStats> {
    Ok(CatalogStats {
        total_ingredients: ingredients::count_ingredients(pool).await?,
        total_recipes: count_recipes(pool).await?,
        total_associations: count_associations(pool).await?,
    })
}
