// Command-line front end for the catalog

pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "recipe-finder")]
#[command(about = "Recipe Finder - find recipes from the ingredients you have", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the local JSON API
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "HOST")]
        host: Option<String>,
    },

    /// Run database migrations
    Migrate,

    #[command(flatten)]
    Catalog(CatalogCommands),
}

/// Commands that work on an opened, migrated catalog
#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    /// Add an ingredient to the catalog
    AddIngredient {
        /// Ingredient name (case-sensitive, must be unique)
        name: String,

        /// Path or URI of an image for the ingredient
        #[arg(short, long)]
        image: Option<String>,
    },

    /// Delete ingredients and their recipe links
    DeleteIngredients {
        /// Ingredient IDs
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// List ingredients by name
    ListIngredients,

    /// Add a recipe made from existing ingredients
    AddRecipe {
        /// Recipe name (case-sensitive, must be unique)
        name: String,

        /// Ingredient ID the recipe requires (repeatable)
        #[arg(short = 'g', long = "ingredient")]
        ingredients: Vec<i64>,

        /// Path or URI of an image for the recipe
        #[arg(short, long)]
        image: Option<String>,
    },

    /// List recipes by name
    ListRecipes,

    /// Show a recipe and its ingredients
    ShowRecipe {
        /// Recipe ID
        id: i64,
    },

    /// Find recipes that use any of the given ingredients
    Find {
        /// Selected ingredient IDs
        ids: Vec<i64>,
    },

    /// Show catalog statistics
    Stats,
}
