use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use anyhow::Context;
use content_service::db::{
    PgBlockRepository, PgCommentRepository, PgNotificationRepository, PgPostRepository,
};
use content_service::storage::S3ObjectStorage;
use content_service::{handlers, AppState, Collaborators, Config};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn health_check(pool: web::Data<sqlx::PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "content-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "content-service"
        })),
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Content Service
///
/// # Routes
///
/// - `/api/v1/posts/*` - Create, read and update posts
/// - `/api/v1/comments/*` - Update and delete comments
/// - `/api/v1/notifications` - Fetch persisted notifications
/// - `/ws/notifications` - Live notification channel
/// - `/health`, `/metrics`
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            anyhow::bail!("failed to load configuration: {}", e);
        }
    };

    tracing::info!("Starting content-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_millis(config.database.acquire_timeout_ms))
        .connect(&config.database.url)
        .await
        .context("failed to connect to PostgreSQL")?;
    tracing::info!("Database pool created");

    let storage = S3ObjectStorage::connect(&config.storage).await;

    let state = AppState::new(
        Collaborators {
            blocks: Arc::new(PgBlockRepository::new(db_pool.clone())),
            posts: Arc::new(PgPostRepository::new(db_pool.clone())),
            comments: Arc::new(PgCommentRepository::new(db_pool.clone())),
            notifications: Arc::new(PgNotificationRepository::new(db_pool.clone())),
            storage: Arc::new(storage),
        },
        &config.media,
        config.realtime.clone(),
    );

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server on {}", bind_address);

    let state_data = web::Data::new(state.clone());
    let pool_data = web::Data::new(db_pool.clone());

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state_data.clone())
            .app_data(pool_data.clone())
            .wrap(Logger::default())
            .route("/health", web::get().to(health_check))
            .route(
                "/metrics",
                web::get().to(content_service::metrics::serve_metrics),
            )
            .configure(handlers::configure)
    })
    .bind(&bind_address)
    .with_context(|| format!("failed to bind {}", bind_address))?
    .disable_signals()
    .run();

    let server_handle = server.handle();
    let server_task = actix_web::rt::spawn(server);

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, stopping HTTP server");
    server_handle.stop(true).await;

    match server_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("HTTP server error: {}", e),
        Err(e) => tracing::error!("HTTP server task failed: {}", e),
    }

    state.shutdown().await;
    db_pool.close().await;

    tracing::info!("content-service stopped");
    Ok(())
}
