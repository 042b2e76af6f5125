//! Biblos Server - School Library Lending Service
//!
//! A Rust JSON API server for browsing, borrowing, and maintaining a small
//! book catalog.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use biblos_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::{
        notify::{LogSubscriber, Notifier},
        Services,
    },
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("biblos_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Biblos Server v{}", env!("CARGO_PKG_VERSION"));

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

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services. The subscriber list is the whole
    // notification wiring; add more subscribers here.
    let repository = Repository::new(pool);
    let notifier = Notifier::new(vec![Arc::new(LogSubscriber)]);
    let services = Services::new(repository, notifier);

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
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
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Library (catalog)
        .route("/library/", get(api::books::list_books))
        .route(
            "/library/add/",
            get(api::books::add_book_form).post(api::books::create_book),
        )
        .route(
            "/library/author/add/",
            get(api::authors::author_form).post(api::authors::create_author),
        )
        .route("/library/author/:author_id/", delete(api::authors::delete_author))
        .route(
            "/library/:book_id/",
            get(api::books::get_book).delete(api::books::delete_book),
        )
        .route(
            "/library/:book_id/edit/",
            get(api::books::edit_book_form).post(api::books::update_book),
        )
        // Circulation
        .route(
            "/book/:book_id/borrow/",
            get(api::loans::borrow_book_redirect).post(api::loans::borrow_book),
        )
        .route(
            "/loans/:loan_id/return/",
            get(api::loans::return_loan_redirect).post(api::loans::return_loan),
        )
        // Tags
        .route("/tags/", get(api::tags::list_tags).post(api::tags::create_tag))
        // Students
        .route(
            "/students/",
            get(api::students::list_students).post(api::students::create_student),
        )
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .merge(routes)
        .merge(openapi)
        .layer(middleware::from_fn_with_state(state, api::maintenance_gate))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
