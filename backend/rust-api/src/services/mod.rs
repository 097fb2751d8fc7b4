use std::sync::Arc;

use crate::config::Config;
use crate::store::{MongoStore, QuizStore};
use mongodb::Client as MongoClient;

pub mod difficulty;
pub mod generator_client;
pub mod quiz_service;
pub mod scoring_service;
pub mod session_identity;

use generator_client::GeneratorClient;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn QuizStore>,
    pub generator: Arc<GeneratorClient>,
}

impl AppState {
    pub async fn new(config: Config, mongo_client: MongoClient) -> anyhow::Result<Self> {
        let mongo = mongo_client.database(&config.mongo_database);
        let store: Arc<dyn QuizStore> = Arc::new(MongoStore::new(mongo));

        tracing::info!("Verifying MongoDB connection...");
        tokio::time::timeout(std::time::Duration::from_secs(5), store.ping())
            .await
            .map_err(|_| anyhow::anyhow!("MongoDB ping timeout after 5s"))??;
        tracing::info!("MongoDB connection established successfully");

        let generator = Arc::new(GeneratorClient::new(&config));

        Ok(Self {
            config,
            store,
            generator,
        })
    }

    /// Builds state over an arbitrary store implementation. Used by the
    /// integration tests to run against the in-memory store.
    pub fn with_store(config: Config, store: Arc<dyn QuizStore>) -> Self {
        let generator = Arc::new(GeneratorClient::new(&config));
        Self {
            config,
            store,
            generator,
        }
    }
}
