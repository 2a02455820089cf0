mod config;
mod handlers;
mod middleware;
mod models;
mod repository;
mod routes;
mod services;
mod utils;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
};
use tokio_cron_scheduler::{Job, JobScheduler};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::{AppConfig, StorageBackend},
    repository::Stores,
    services::notification::{LoggingNotifier, NotificationGateway, ReminderService},
    utils::database::create_pool,
};

#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
    pub notifier: Arc<dyn NotificationGateway>,
    pub config: Arc<AppConfig>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "interview_organiser=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(AppConfig::from_env()?);

    let stores = match (config.storage, config.database_url.as_deref()) {
        (StorageBackend::Postgres, Some(database_url)) => {
            let pool = create_pool(database_url, config.database_max_connections).await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            Stores::postgres(pool)
        }
        (StorageBackend::Postgres, None) => anyhow::bail!("DATABASE_URL must be set"),
        (StorageBackend::Memory, _) => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Stores::in_memory()
        }
    };

    let state = AppState {
        stores,
        notifier: Arc::new(LoggingNotifier),
        config: config.clone(),
    };

    let allowed_origin = if config.cors_allowed_origin == "*" {
        HeaderValue::from_static("*")
    } else {
        config.cors_allowed_origin.parse::<HeaderValue>()?
    };
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = routes::build_router(state.clone())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(config.max_request_body_bytes()));

    let _scheduler = start_reminder_scheduler(&state, &config.reminder_cron).await?;

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!("Server running on http://{}", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Registers the daily interview reminder job. The returned scheduler must be
/// kept alive for the job to keep firing.
async fn start_reminder_scheduler(state: &AppState, cron: &str) -> anyhow::Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let stores = state.stores.clone();
    let notifier = state.notifier.clone();
    let job = Job::new_async(cron, move |_uuid, _l| {
        let reminders = ReminderService::new(stores.clone(), notifier.clone());
        Box::pin(async move {
            match reminders.process_daily_reminders().await {
                Ok(sent) => tracing::info!("Daily reminders processed: {} sent", sent),
                Err(e) => tracing::error!("Failed to process reminders: {}", e),
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    tracing::info!("Reminder scheduler started with schedule '{}'", cron);

    Ok(scheduler)
}
