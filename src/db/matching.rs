//! Recipe lookup by selected ingredients.
//!
//! A recipe matches when at least one of the ingredients it requires is in
//! the selection. Ingredients the recipe needs but the user did not select
//! are ignored, so selecting only garlic still finds a stew that also needs
//! beef and carrots. Results are ordered by recipe name and each recipe
//! appears once no matter how many selected ingredients it uses.

use crate::db::{models::Recipe, DbPool};
use crate::error::Result;
use crate::utils::validation::selection;
use tracing::debug;

/// Find every recipe that uses at least one of the selected ingredients
pub async fn find_recipes(pool: &DbPool, ingredient_ids: &[i64]) -> Result<Vec<Recipe>> {
    let ingredient_ids = selection(ingredient_ids)?;

    let placeholders = ingredient_ids
        .iter()
        .enumerate()
        .map(|(i, _)| format!("?{}", i + 1))
        .collect::<Vec<_>>()
        .join(",");

    let query_str = format!(
        r#"
        SELECT r.id, r.name, NULLIF(r.image, '') AS image
        FROM recipes r
        JOIN recipe_ingredient ri ON ri.recipe_id = r.id
        WHERE ri.ingredient_id IN ({placeholders})
        GROUP BY r.id, r.name, r.image
        ORDER BY r.name, r.id
        "#
    );

    let mut query = sqlx::query_as::<_, Recipe>(&query_str);
    for id in &ingredient_ids {
        query = query.bind(id);
    }

    let recipes = query.fetch_all(pool).await?;

    debug!(
        "Selection {:?} matched {} recipes",
        ingredient_ids,
        recipes.len()
    );

    Ok(recipes)
}
