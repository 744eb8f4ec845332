use crate::db::{models::*, DbPool};
use crate::error::{Error, Result};
use crate::utils::validation::{check_selection_size, distinct_ids, normalize_image, validate_name};
use sqlx::{Executor, Sqlite};
use tracing::{debug, info, warn};

/// Add an ingredient to the catalog
pub async fn add_ingredient(pool: &DbPool, new_ingredient: &NewIngredient) -> Result<Ingredient> {
    validate_name("Ingredient", &new_ingredient.name)?;
    let image = normalize_image(new_ingredient.image.as_deref());

    let ingredient = sqlx::query_as::<_, Ingredient>(
        "INSERT INTO ingredients (name, image) VALUES (?, ?) RETURNING id, name, image",
    )
    .bind(&new_ingredient.name)
    .bind(&image)
    .fetch_one(pool)
    .await
    .map_err(|e| Error::from_insert(e, "Ingredient", &new_ingredient.name))?;

    info!("Added ingredient {} ({})", ingredient.id, ingredient.name);
    Ok(ingredient)
}

/// Get ingredient by ID
pub async fn get_ingredient(pool: &DbPool, ingredient_id: i64) -> Result<Ingredient> {
    let ingredient = sqlx::query_as::<_, Ingredient>(
        "SELECT id, name, NULLIF(image, '') AS image FROM ingredients WHERE id = ?",
    )
    .bind(ingredient_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Ingredient {ingredient_id} not found")))?;

    Ok(ingredient)
}

/// List all ingredients ordered by name
pub async fn list_ingredients(pool: &DbPool) -> Result<Vec<Ingredient>> {
    let ingredients = sqlx::query_as::<_, Ingredient>(
        "SELECT id, name, NULLIF(image, '') AS image FROM ingredients ORDER BY name, id",
    )
    .fetch_all(pool)
    .await?;

    Ok(ingredients)
}

/// Return the subset of `ids` that has no ingredient row
pub async fn find_missing_ingredients<'e, E>(executor: E, ids: &[i64]) -> Result<Vec<i64>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let ids = distinct_ids(ids);
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    check_selection_size(ids.len())?;

    let placeholders = vec!["?"; ids.len()].join(",");
    let query_str = format!("SELECT id FROM ingredients WHERE id IN ({placeholders})");

    let mut query = sqlx::query_scalar::<_, i64>(&query_str);
    for id in &ids {
        query = query.bind(id);
    }
    let existing: Vec<i64> = query.fetch_all(executor).await?;

    Ok(ids.into_iter().filter(|id| !existing.contains(id)).collect())
}

/// Delete one ingredient and every association referencing it
///
/// Returns `false` when no ingredient with that id exists.
pub async fn delete_ingredient(pool: &DbPool, ingredient_id: i64) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let unlinked = sqlx::query("DELETE FROM recipe_ingredient WHERE ingredient_id = ?")
        .bind(ingredient_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let removed = sqlx::query("DELETE FROM ingredients WHERE id = ?")
        .bind(ingredient_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    if removed > 0 {
        info!(
            "Deleted ingredient {} ({} recipe links removed)",
            ingredient_id, unlinked
        );
    } else {
        debug!("Ingredient {} does not exist, nothing deleted", ingredient_id);
    }

    Ok(removed > 0)
}

/// Delete a set of ingredients, continuing past individual failures
pub async fn delete_ingredients(pool: &DbPool, ingredient_ids: &[i64]) -> Result<DeleteReport> {
    if ingredient_ids.is_empty() {
        return Err(Error::EmptySelection);
    }

    let mut report = DeleteReport::default();

    for id in distinct_ids(ingredient_ids) {
        match delete_ingredient(pool, id).await {
            Ok(true) => report.deleted.push(id),
            Ok(false) => report.missing.push(id),
            Err(e) => {
                warn!("Failed to delete ingredient {}: {}", id, e.log_safe());
                report.failed.push(DeleteFailure {
                    id,
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        "Bulk delete finished: {} deleted, {} missing, {} failed",
        report.deleted.len(),
        report.missing.len(),
        report.failed.len()
    );

    Ok(report)
}

/// Count total ingredients
pub async fn count_ingredients(pool: &DbPool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ingredients")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

/// Get the ingredients a recipe requires, ordered by name
pub async fn get_ingredients_for_recipe(pool: &DbPool, recipe_id: i64) -> Result<Vec<Ingredient>> {
    let ingredients = sqlx::query_as::<_, Ingredient>(
        r#"
        SELECT i.id, i.name, NULLIF(i.image, '') AS image
        FROM ingredients i
        JOIN recipe_ingredient ri ON ri.ingredient_id = i.id
        WHERE ri.recipe_id = ?
        ORDER BY i.name, i.id
        "#,
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await?;

    Ok(ingredients)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open;

    fn ingredient(name: &str) -> NewIngredient {
        NewIngredient {
            name: name.to_string(),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_ingredients() {
        let pool = open("sqlite::memory:").await.unwrap();

        let salt = add_ingredient(
            &pool,
            &NewIngredient {
                name: "Salt".to_string(),
                image: Some("/images/salt.png".to_string()),
            },
        )
        .await
        .unwrap();
        add_ingredient(&pool, &ingredient("Pepper")).await.unwrap();
        add_ingredient(&pool, &ingredient("Garlic")).await.unwrap();

        let names: Vec<String> = list_ingredients(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Garlic", "Pepper", "Salt"]);

        let retrieved = get_ingredient(&pool, salt.id).await.unwrap();
        assert_eq!(retrieved, salt);
        assert_eq!(retrieved.image.as_deref(), Some("/images/salt.png"));
    }

    #[tokio::test]
    async fn test_duplicate_ingredient_is_rejected() {
        let pool = open("sqlite::memory:").await.unwrap();

        add_ingredient(&pool, &ingredient("Salt")).await.unwrap();
        let err = add_ingredient(&pool, &ingredient("Salt")).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateName { kind: "Ingredient", .. }));

        // Names are case-sensitive
        add_ingredient(&pool, &ingredient("salt")).await.unwrap();
        assert_eq!(count_ingredients(&pool).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_blank_name_and_image() {
        let pool = open("sqlite::memory:").await.unwrap();

        let err = add_ingredient(&pool, &ingredient("  ")).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let stored = add_ingredient(
            &pool,
            &NewIngredient {
                name: "Basil".to_string(),
                image: Some(String::new()),
            },
        )
        .await
        .unwrap();
        assert_eq!(stored.image, None);

        // Only the empty string means "no image"
        let spaced = add_ingredient(
            &pool,
            &NewIngredient {
                name: "Chive".to_string(),
                image: Some(" ".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(spaced.image.as_deref(), Some(" "));
        assert_eq!(
            get_ingredient(&pool, spaced.id).await.unwrap().image.as_deref(),
            Some(" ")
        );
    }

    #[tokio::test]
    async fn test_legacy_empty_image_reads_as_none() {
        let pool = open("sqlite::memory:").await.unwrap();

        sqlx::query("INSERT INTO ingredients (name, image) VALUES ('Chili', '')")
            .execute(&pool)
            .await
            .unwrap();

        let listed = list_ingredients(&pool).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].image, None);
    }

    #[tokio::test]
    async fn test_delete_ingredients_reports_missing() {
        let pool = open("sqlite::memory:").await.unwrap();

        let salt = add_ingredient(&pool, &ingredient("Salt")).await.unwrap();
        let pepper = add_ingredient(&pool, &ingredient("Pepper")).await.unwrap();

        let report = delete_ingredients(&pool, &[salt.id, 999, salt.id])
            .await
            .unwrap();
        assert_eq!(report.deleted, vec![salt.id]);
        assert_eq!(report.missing, vec![999]);
        assert!(report.is_complete());

        let remaining = list_ingredients(&pool).await.unwrap();
        assert_eq!(remaining, vec![pepper]);
    }

    #[tokio::test]
    async fn test_delete_requires_selection() {
        let pool = open("sqlite::memory:").await.unwrap();
        let err = delete_ingredients(&pool, &[]).await.unwrap_err();
        assert!(matches!(err, Error::EmptySelection));
    }

    #[tokio::test]
    async fn test_find_missing_rejects_oversized_list() {
        let pool = open("sqlite::memory:").await.unwrap();
        let ids: Vec<i64> = (1..=40_000).collect();

        let err = find_missing_ingredients(&pool, &ids).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_find_missing_ingredients() {
        let pool = open("sqlite::memory:").await.unwrap();
        let salt = add_ingredient(&pool, &ingredient("Salt")).await.unwrap();

        let missing = find_missing_ingredients(&pool, &[salt.id, 42, 7, 42])
            .await
            .unwrap();
        assert_eq!(missing, vec![7, 42]);
    }
}
