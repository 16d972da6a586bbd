use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::MongoSessionRepository,
    services::{OpenAiContentProvider, TelegramClient, WorkflowService},
};

#[derive(Clone)]
pub struct AppState {
    pub workflow_service: Arc<WorkflowService>,
    pub telegram_client: Arc<TelegramClient>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let session_repository =
            Arc::new(MongoSessionRepository::new(&db, &config.sessions_collection));
        session_repository.ensure_indexes().await?;

        let content_provider = Arc::new(OpenAiContentProvider::new(&config));
        let workflow_service = Arc::new(WorkflowService::new(session_repository, content_provider));

        let telegram_client = Arc::new(TelegramClient::new(&config)?);

        Ok(Self {
            workflow_service,
            telegram_client,
            config: Arc::new(config),
        })
    }
}
