//! Civimod server entry point.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{Router, middleware};
use civimod_api::{AppState, auth_middleware, router as api_router};
use civimod_common::{Config, LocalMediaStore};
use civimod_core::{
    LogNotifier, ModerationService, ReportService, SanctionService, SessionService,
};
use civimod_db::repositories::{
    ContentRepository, ReportRepository, SessionRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "civimod=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting civimod server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = Arc::new(civimod_db::init(&config).await?);
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    civimod_db::migrate(&db).await?;
    info!("Migrations completed");

    // Repositories
    let user_repo = UserRepository::new(Arc::clone(&db));
    let content_repo = ContentRepository::new(Arc::clone(&db));
    let report_repo = ReportRepository::new(Arc::clone(&db));
    let session_repo = SessionRepository::new(Arc::clone(&db));

    // Services
    let session_service = SessionService::new(session_repo, user_repo.clone(), &config);

    let media_store = Arc::new(LocalMediaStore::new(
        PathBuf::from(&config.media.base_path),
        config.media.base_url.clone(),
    ));
    let mut report_service = ReportService::new(report_repo.clone(), content_repo.clone());
    report_service.set_media_store(media_store);

    let sanction_service = SanctionService::new(user_repo.clone());

    let mut moderation_service = ModerationService::new(
        report_repo,
        content_repo,
        user_repo,
        sanction_service.clone(),
    );
    moderation_service.set_notifier(Arc::new(LogNotifier));

    let state = AppState {
        session_service,
        report_service,
        moderation_service,
        sanction_service,
    };

    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
