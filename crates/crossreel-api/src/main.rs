mod error;
mod handlers;
mod routes;
mod server;
mod state;
mod telemetry;

use std::sync::Arc;

use crossreel_core::Config;
use crossreel_publish::{JsonlResultSink, PublishOrchestrator};
use crossreel_storage::create_storage;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    telemetry::init(&config);

    let storage = create_storage(&config).await?;
    tracing::info!(backend = %storage.backend_type(), "Storage initialized");

    let sink = Arc::new(JsonlResultSink::new(&config.result_log_path));
    let orchestrator = PublishOrchestrator::from_config(&config, storage.clone(), sink)?;

    let state = Arc::new(state::AppState {
        config: config.clone(),
        storage,
        orchestrator,
    });

    let router = routes::build_router(state);
    server::start_server(&config, router).await?;

    Ok(())
}
