use axum_helpers::server::{ShutdownCoordinator, create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_users::RegistrationHandler;
use message_queue::{ConsumerConfig, QueueClient, QueueConsumer, RedisQueueClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Before any fallible operation so startup errors are colored too
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);
    message_queue::init_metrics().map_err(|e| eyre::eyre!("Metrics recorder failed: {}", e))?;

    let db = match config.database.clone() {
        Some(db_config) => {
            let db = database::postgres::connect_from_config_with_retry(db_config, None)
                .await
                .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;
            database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name)
                .await
                .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;
            Some(db)
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory repositories");
            None
        }
    };

    // Neither client connects here; the consumer keeps retrying until Redis is up
    let redis = database::redis::client(&config.redis)?;
    let queue: Arc<dyn QueueClient> =
        Arc::new(RedisQueueClient::from_url(&config.redis.url, &config.queue)?);

    let state = AppState::new(config, db, redis, queue);
    let shutdown = ShutdownCoordinator::new();

    let consumer = QueueConsumer::new(
        state.queue.clone(),
        RegistrationHandler::new(Arc::new(state.users.clone())),
        ConsumerConfig::from(&state.config.queue),
    );
    let consumer_shutdown = shutdown.subscribe();
    let consumer_task = tokio::spawn(async move { consumer.run(consumer_shutdown).await });

    let api_routes = api::routes(&state);

    // create_router adds /api, docs and middleware to our composed routes
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes)?;

    // - /health: liveness with app name/version
    // - /ready: database (when configured) and redis checks
    // - /metrics: prometheus exposition
    let app = router
        .merge(health_router(state.config.app.clone()))
        .merge(api::ops_router(state.clone()));

    let server = state.config.server.clone();
    info!(
        app = state.config.app.name,
        version = state.config.app.version,
        persistence = if state.db.is_some() { "postgres" } else { "memory" },
        queue = %state.config.queue.queue_name,
        "Starting playhub API"
    );

    create_production_app(
        app,
        &server,
        Duration::from_secs(30),
        shutdown,
        async move {
            // The coordinator has already flipped; wait for the in-flight message to settle
            info!("Shutting down: stopping registration consumer");
            if let Err(e) = consumer_task.await {
                error!(error = %e, "Registration consumer task failed");
            }

            if let Some(db) = state.db {
                match db.close().await {
                    Ok(()) => info!("PostgreSQL connection closed successfully"),
                    Err(e) => error!("Error closing PostgreSQL: {}", e),
                }
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Playhub API shutdown complete");
    Ok(())
}
