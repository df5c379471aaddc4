//! LocalLibrary Server - Library Catalog Web Application

use axum::{response::Redirect, routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use locallibrary_server::{config::AppConfig, repository::Repository, services::Services, web, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "locallibrary_server={},tower_http=debug",
            config.logging.level
        )
        .into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting LocalLibrary Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Load the template engine once; handlers share it through AppState
    let templates = tera::Tera::new("templates/**/*.html").expect("Failed to load templates");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository);

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
        templates: Arc::new(templates),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // Catalog routes
    let catalog = Router::new()
        // Home
        .route("/", get(web::books::index))
        // Books
        .route("/books", get(web::books::list))
        .route(
            "/book/create",
            get(web::books::create_form).post(web::books::create),
        )
        .route("/book/:id", get(web::books::detail))
        .route(
            "/book/:id/update",
            get(web::books::update_form).post(web::books::update),
        )
        .route(
            "/book/:id/delete",
            get(web::books::delete_form).post(web::books::delete),
        )
        // Authors
        .route("/authors", get(web::authors::list))
        .route(
            "/author/create",
            get(web::authors::create_form).post(web::authors::create),
        )
        .route("/author/:id", get(web::authors::detail))
        .route(
            "/author/:id/update",
            get(web::authors::update_form).post(web::authors::update),
        )
        .route(
            "/author/:id/delete",
            get(web::authors::delete_form).post(web::authors::delete),
        )
        // Genres
        .route("/genres", get(web::genres::list))
        .route(
            "/genre/create",
            get(web::genres::create_form).post(web::genres::create),
        )
        .route("/genre/:id", get(web::genres::detail))
        .route(
            "/genre/:id/update",
            get(web::genres::update_form).post(web::genres::update),
        )
        .route(
            "/genre/:id/delete",
            get(web::genres::delete_form).post(web::genres::delete),
        )
        // Book instances
        .route("/bookinstances", get(web::book_instances::list))
        .route(
            "/bookinstance/create",
            get(web::book_instances::create_form).post(web::book_instances::create),
        )
        .route("/bookinstance/:id", get(web::book_instances::detail))
        .route(
            "/bookinstance/:id/update",
            get(web::book_instances::update_form).post(web::book_instances::update),
        )
        .route(
            "/bookinstance/:id/delete",
            get(web::book_instances::delete_form).post(web::book_instances::delete),
        )
        .with_state(state);

    Router::new()
        .route("/", get(|| async { Redirect::to("/catalog") }))
        .nest("/catalog", catalog)
        .layer(TraceLayer::new_for_http())
}
