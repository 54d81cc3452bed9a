//! Application state.

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use jobboard_firestore::{
    ApplicationRepository, ApplicationStore, FirestoreClient, FirestoreResult, JobRepository,
    JobStore, MemoryStore,
};

use crate::auth::SessionKeys;
use crate::config::{ApiConfig, StoreBackend};
use crate::services::ApplicationService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub sessions: SessionKeys,
    pub jobs: Arc<dyn JobStore>,
    pub applications: Arc<dyn ApplicationStore>,
    pub service: ApplicationService,
}

impl AppState {
    /// Create new application state, connecting to the configured store.
    pub async fn new(config: ApiConfig) -> FirestoreResult<Self> {
        let (jobs, applications): (Arc<dyn JobStore>, Arc<dyn ApplicationStore>) =
            match config.store_backend {
                StoreBackend::Firestore => {
                    let start = Instant::now();
                    let client = FirestoreClient::from_env().await?;
                    info!(
                        emulator = client.is_emulator(),
                        jobs = %config.jobs_collection,
                        applications = %config.applications_collection,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Firestore client ready"
                    );
                    let jobs: Arc<dyn JobStore> = Arc::new(JobRepository::new(
                        client.clone(),
                        config.jobs_collection.clone(),
                    ));
                    let applications: Arc<dyn ApplicationStore> = Arc::new(
                        ApplicationRepository::new(client, config.applications_collection.clone()),
                    );
                    (jobs, applications)
                }
                StoreBackend::Memory => {
                    info!("Using in-memory store; data will not survive a restart");
                    let store = Arc::new(MemoryStore::new());
                    let jobs: Arc<dyn JobStore> = store.clone();
                    let applications: Arc<dyn ApplicationStore> = store;
                    (jobs, applications)
                }
            };

        Ok(Self::with_stores(config, jobs, applications))
    }

    /// Build state over already constructed stores.
    pub fn with_stores(
        config: ApiConfig,
        jobs: Arc<dyn JobStore>,
        applications: Arc<dyn ApplicationStore>,
    ) -> Self {
        let sessions = SessionKeys::new(
            config.jwt_secret.as_bytes(),
            config.session_ttl,
            config.cookie,
        );
        let service = ApplicationService::new(Arc::clone(&jobs), Arc::clone(&applications));

        Self {
            config,
            sessions,
            jobs,
            applications,
            service,
        }
    }
}
