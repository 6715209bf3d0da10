use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::{Collection, Database};

use crate::errors::{AppError, Result};
use crate::models::sports_match::{SportsMatch, UpsertOutcome};

pub const MATCHES_COLLECTION: &str = "sports_matches";

/// What the pipeline and the HTTP layer need from persistent storage.
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Insert-or-replace keyed by `match_id`. Tracked fields are written in full.
    async fn upsert(&self, record: &SportsMatch) -> Result<UpsertOutcome>;

    /// Newest `last_updated` first. An empty `statuses` slice matches every record.
    async fn find_by_status(&self, statuses: &[&str], limit: i64) -> Result<Vec<SportsMatch>>;

    async fn find_by_match_id(&self, match_id: &str) -> Result<Option<SportsMatch>>;

    async fn ping(&self) -> Result<()>;
}

#[derive(Clone)]
pub struct MongoMatchStore {
    db: Database,
    collection: Collection<SportsMatch>,
}

impl MongoMatchStore {
    pub fn new(db: &Database) -> Self {
        Self {
            db: db.clone(),
            collection: db.collection(MATCHES_COLLECTION),
        }
    }
}

/// `$set` of every tracked field. `_id` is left to the server; unset scores are written
/// as `null` so a refresh clears them.
fn update_for(record: &SportsMatch) -> Result<Document> {
    let mut fields = bson::to_document(record)?;
    fields.remove("_id");
    Ok(doc! { "$set": fields })
}

#[async_trait]
impl MatchStore for MongoMatchStore {
    async fn upsert(&self, record: &SportsMatch) -> Result<UpsertOutcome> {
        let result = self
            .collection
            .update_one(doc! { "match_id": &record.match_id }, update_for(record)?)
            .upsert(true)
            .await?;

        if result.upserted_id.is_some() {
            Ok(UpsertOutcome::Inserted)
        } else if result.matched_count > 0 {
            Ok(UpsertOutcome::Updated)
        } else {
            Err(AppError::store(format!(
                "upsert of {} neither matched nor inserted a document",
                record.match_id
            )))
        }
    }

    async fn find_by_status(&self, statuses: &[&str], limit: i64) -> Result<Vec<SportsMatch>> {
        let filter = match statuses {
            [] => doc! {},
            [status] => doc! { "status": *status },
            many => doc! { "status": { "$in": many.to_vec() } },
        };

        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "last_updated": -1 })
            .limit(limit)
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn find_by_match_id(&self, match_id: &str) -> Result<Option<SportsMatch>> {
        Ok(self.collection.find_one(doc! { "match_id": match_id }).await?)
    }

    async fn ping(&self) -> Result<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
