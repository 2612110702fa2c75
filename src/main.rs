use portfolio_api::{build_router, AppState, Config};
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Missing env files are fine; variables may come from the environment
    let _ = dotenvy::from_filename("config/config.env");
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portfolio_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting portfolio API server");

    let config = Config::from_env().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;
    let port = config.port;
    info!(environment = %config.environment, "Configuration loaded");

    let app_state = match config.database_url.clone() {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(&database_url)
                .await?;
            info!("Connected to database");
            AppState::postgres(config, pool).await?
        }
        None => {
            info!("DATABASE_URL not set, using in-memory store");
            AppState::in_memory(config)
        }
    };

    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Server listening on port {port}");
    axum::serve(listener, app).await?;

    Ok(())
}
