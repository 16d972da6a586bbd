use async_trait::async_trait;
use mongodb::{
    bson::doc,
    options::{IndexOptions, ReplaceOptions},
    Collection, IndexModel,
};

use crate::{db::Database, errors::AppResult, models::domain::StudySession};

/// Per-user session persistence. One record per `user_id` with
/// last-write-wins semantics; each write replaces the whole document so
/// a session can never be half-applied.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<StudySession>>;
    async fn upsert(&self, session: StudySession) -> AppResult<StudySession>;
    async fn delete(&self, user_id: &str) -> AppResult<()>;
}

pub struct MongoSessionRepository {
    collection: Collection<StudySession>,
}

impl MongoSessionRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for study sessions collection");

        let user_id_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_id_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(user_id_index).await?;

        log::info!("Successfully created indexes for study sessions collection");
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for MongoSessionRepository {
    async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<StudySession>> {
        let session = self
            .collection
            .find_one(doc! { "user_id": user_id })
            .await?;
        Ok(session)
    }

    async fn upsert(&self, session: StudySession) -> AppResult<StudySession> {
        // Single-document replace keyed by user_id; the upsert is atomic
        // per key, which is the only ordering guarantee handlers rely on.
        self.collection
            .replace_one(doc! { "user_id": &session.user_id }, &session)
            .with_options(ReplaceOptions::builder().upsert(true).build())
            .await?;
        Ok(session)
    }

    async fn delete(&self, user_id: &str) -> AppResult<()> {
        self.collection
            .delete_one(doc! { "user_id": user_id })
            .await?;
        Ok(())
    }
}
