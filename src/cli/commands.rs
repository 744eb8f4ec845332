use crate::db::{
    self,
    models::{DeleteReport, Ingredient, NewIngredient, NewRecipe, Recipe},
    DbPool,
};
use crate::utils::sanitize::{image_label, truncate};
use crate::Result;

/// Add an ingredient
pub async fn add_ingredient(pool: &DbPool, name: &str, image: Option<String>) -> Result<()> {
    let ingredient = db::ingredients::add_ingredient(
        pool,
        &NewIngredient {
            name: name.to_string(),
            image,
        },
    )
    .await?;

    println!(
        "\x1b[32m\u{2713}\x1b[0m Ingredient added: {} (ID {})",
        ingredient.name, ingredient.id
    );
    Ok(())
}

/// Delete a selection of ingredients
pub async fn delete_ingredients(pool: &DbPool, ids: &[i64]) -> Result<()> {
    let report = db::ingredients::delete_ingredients(pool, ids).await?;
    print_delete_report(&report);
    Ok(())
}

/// List ingredients
pub async fn list_ingredients(pool: &DbPool) -> Result<()> {
    let ingredients = db::ingredients::list_ingredients(pool).await?;
    print_ingredients(&ingredients);
    Ok(())
}

/// Add a recipe from selected ingredients
pub async fn add_recipe(
    pool: &DbPool,
    name: &str,
    ingredient_ids: Vec<i64>,
    image: Option<String>,
) -> Result<()> {
    let recipe = db::recipes::add_recipe(
        pool,
        &NewRecipe {
            name: name.to_string(),
            image,
            ingredient_ids,
        },
    )
    .await?;

    println!(
        "\x1b[32m\u{2713}\x1b[0m Recipe added: {} (ID {})",
        recipe.name, recipe.id
    );
    Ok(())
}

/// List recipes
pub async fn list_recipes(pool: &DbPool) -> Result<()> {
    let recipes = db::recipes::list_recipes(pool).await?;

    if recipes.is_empty() {
        println!("No recipes yet");
        return Ok(());
    }

    print_recipes(&recipes);
    Ok(())
}

/// Show one recipe with its ingredients
pub async fn show_recipe(pool: &DbPool, id: i64) -> Result<()> {
    let details = db::recipes::get_recipe_with_ingredients(pool, id).await?;

    println!("{} (ID {})", details.recipe.name, details.recipe.id);
    println!("  Image: {}", image_label(details.recipe.image.as_deref()));

    if details.ingredients.is_empty() {
        println!("  Ingredients: none (all were deleted)");
    } else {
        println!("  Ingredients:");
        for ingredient in &details.ingredients {
            println!("    - {} (ID {})", ingredient.name, ingredient.id);
        }
    }

    Ok(())
}

/// Find recipes using any of the selected ingredients
pub async fn find(pool: &DbPool, ids: &[i64]) -> Result<()> {
    let recipes = db::matching::find_recipes(pool, ids).await?;

    if recipes.is_empty() {
        println!("No recipes found");
        return Ok(());
    }

    println!("\nFound {} recipes:\n", recipes.len());
    print_recipes(&recipes);
    Ok(())
}

/// Print catalog statistics
pub async fn stats(pool: &DbPool) -> Result<()> {
    let stats = db::recipes::catalog_stats(pool).await?;

    println!("Ingredients:  {}", stats.total_ingredients);
    println!("Recipes:      {}", stats.total_recipes);
    println!("Links:        {}", stats.total_associations);
    Ok(())
}

// Helper functions

fn print_ingredients(ingredients: &[Ingredient]) {
    if ingredients.is_empty() {
        println!("No ingredients yet");
        return;
    }

    println!("{:<5} {:<30} {:<40}", "ID", "Name", "Image");
    println!("{}", "-".repeat(75));

    for ingredient in ingredients {
        println!(
            "{:<5} {:<30} {:<40}",
            ingredient.id,
            truncate(&ingredient.name, 28),
            truncate(image_label(ingredient.image.as_deref()), 38)
        );
    }
}

fn print_recipes(recipes: &[Recipe]) {
    println!("{:<5} {:<30} {:<40}", "ID", "Name", "Image");
    println!("{}", "-".repeat(75));

    for recipe in recipes {
        println!(
            "{:<5} {:<30} {:<40}",
            recipe.id,
            truncate(&recipe.name, 28),
            truncate(image_label(recipe.image.as_deref()), 38)
        );
    }
}

fn print_delete_report(report: &DeleteReport) {
    if !report.deleted.is_empty() {
        println!(
            "\x1b[32m\u{2713}\x1b[0m Deleted {} ingredient(s): {}",
            report.deleted.len(),
            join_ids(&report.deleted)
        );
    }

    if !report.missing.is_empty() {
        println!("  Not found (skipped): {}", join_ids(&report.missing));
    }

    for failure in &report.failed {
        println!(
            "\x1b[31m\u{2717}\x1b[0m Could not delete {}: {}",
            failure.id, failure.reason
        );
    }
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[tokio::test]
    async fn test_commands_surface_core_errors() {
        let pool = db::open("sqlite::memory:").await.unwrap();

        add_ingredient(&pool, "Salt", None).await.unwrap();
        assert!(matches!(
            add_ingredient(&pool, "Salt", None).await,
            Err(Error::DuplicateName { .. })
        ));
        assert!(matches!(find(&pool, &[]).await, Err(Error::EmptySelection)));
        assert!(matches!(
            add_recipe(&pool, "Soup", vec![], None).await,
            Err(Error::EmptySelection)
        ));
    }

    #[tokio::test]
    async fn test_commands_happy_path() {
        let pool = db::open("sqlite::memory:").await.unwrap();

        add_ingredient(&pool, "Rice", Some("rice.png".to_string()))
            .await
            .unwrap();
        add_recipe(&pool, "Fried Rice", vec![1], None).await.unwrap();

        assert!(list_ingredients(&pool).await.is_ok());
        assert!(list_recipes(&pool).await.is_ok());
        assert!(show_recipe(&pool, 1).await.is_ok());
        assert!(find(&pool, &[1]).await.is_ok());
        assert!(delete_ingredients(&pool, &[1, 2]).await.is_ok());
        assert!(stats(&pool).await.is_ok());
    }

    #[test]
    fn test_join_ids() {
        assert_eq!(join_ids(&[1, 2, 3]), "1, 2, 3");
        assert_eq!(join_ids(&[]), "");
    }
}
