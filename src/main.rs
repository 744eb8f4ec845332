use clap::Parser;
use recipe_finder::{
    api::{handlers::AppState, routes},
    cli::{commands, CatalogCommands, Cli, Commands},
    config::Settings,
    db, Error, Result,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if it exists
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,recipe_finder=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("\x1b[31m\u{2717}\x1b[0m {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::from_env()?;
    settings.validate()?;

    match cli.command {
        Commands::Serve { port, host } => serve(settings, port, host).await,
        Commands::Migrate => {
            let pool = db::init_pool_with_config(&settings.database).await?;
            db::run_migrations(&pool).await?;
            println!("\x1b[32m\u{2713}\x1b[0m Database migrations completed successfully");
            Ok(())
        }
        Commands::Catalog(command) => {
            let pool = db::init_pool_with_config(&settings.database).await?;
            db::run_migrations(&pool).await?;
            execute(&pool, command).await
        }
    }
}

async fn execute(pool: &db::DbPool, command: CatalogCommands) -> Result<()> {
    match command {
        CatalogCommands::AddIngredient { name, image } => {
            commands::add_ingredient(pool, &name, image).await
        }
        CatalogCommands::DeleteIngredients { ids } => {
            commands::delete_ingredients(pool, &ids).await
        }
        CatalogCommands::ListIngredients => commands::list_ingredients(pool).await,
        CatalogCommands::AddRecipe {
            name,
            ingredients,
            image,
        } => commands::add_recipe(pool, &name, ingredients, image).await,
        CatalogCommands::ListRecipes => commands::list_recipes(pool).await,
        CatalogCommands::ShowRecipe { id } => commands::show_recipe(pool, id).await,
        CatalogCommands::Find { ids } => commands::find(pool, &ids).await,
        CatalogCommands::Stats => commands::stats(pool).await,
    }
}

async fn serve(mut settings: Settings, port: Option<u16>, host: Option<String>) -> Result<()> {
    // Override settings with CLI arguments
    if let Some(port) = port {
        settings.server.port = port;
    }
    if let Some(host) = host {
        settings.server.host = host;
    }

    info!("Starting Recipe Finder API");
    info!("Database: {}", settings.database.url);

    let pool = db::init_pool_with_config(&settings.database).await?;
    info!(
        "Database connection established (max_connections: {}, min_connections: {})",
        settings.database.max_connections, settings.database.min_connections
    );

    db::run_migrations(&pool).await?;
    info!("Database migrations completed");

    let state = AppState::new(pool);
    let app = routes::create_router(state, &settings);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    println!("\n========================================");
    println!("Recipe Finder");
    println!("========================================");
    println!("Address: http://{addr}");
    println!("\nAPI Endpoints:");
    println!("  GET    /api/ingredients");
    println!("  POST   /api/ingredients");
    println!("  POST   /api/ingredients/delete");
    println!("  DELETE /api/ingredients/:id");
    println!("  GET    /api/recipes");
    println!("  POST   /api/recipes");
    println!("  GET    /api/recipes/:id");
    println!("  GET    /api/recipes/find?ingredients=1,2");
    println!("  GET    /api/stats");
    println!("\nPress Ctrl+C to stop");
    println!("========================================\n");

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Internal(format!("Server error: {e}")))?;

    info!("Shutting down...");
    Ok(())
}
