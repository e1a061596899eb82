//! Shared application state

use std::sync::Arc;

use crossreel_core::Config;
use crossreel_publish::PublishOrchestrator;
use crossreel_storage::Storage;

pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub orchestrator: PublishOrchestrator,
}
