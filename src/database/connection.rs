use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Client, Database, IndexModel};

use crate::config::AppConfig;
use crate::database::store::MATCHES_COLLECTION;
use crate::errors::{AppError, Result};
use crate::models::sports_match::SportsMatch;

pub async fn get_db_client(config: &AppConfig) -> Result<Database> {
    let client = Client::with_uri_str(&config.mongo_uri)
        .await
        .map_err(|e| AppError::configuration(format!("invalid MONGO_URI: {}", e)))?;

    let db = client.database(&config.mongo_database);

    match db.list_collection_names().await {
        Ok(collections) => {
            tracing::info!("✅ Connected to database: {}", config.mongo_database);
            if !collections.iter().any(|c| c == MATCHES_COLLECTION) {
                tracing::warn!("⚠️ '{}' collection not found, it will be created on first write", MATCHES_COLLECTION);
            }
        }
        Err(e) => {
            tracing::error!("❌ Database '{}' may not exist or is inaccessible: {}", config.mongo_database, e);
        }
    }

    Ok(db)
}

/// `status` and `last_updated` back the read endpoints; `match_id` is the upsert key.
pub async fn create_indexes(db: &Database) -> Result<()> {
    let collection = db.collection::<SportsMatch>(MATCHES_COLLECTION);

    collection
        .create_index(IndexModel::builder().keys(doc! { "status": 1 }).build())
        .await?;
    collection
        .create_index(IndexModel::builder().keys(doc! { "last_updated": -1 }).build())
        .await?;
    collection
        .create_index(
            IndexModel::builder()
                .keys(doc! { "match_id": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
        )
        .await?;

    tracing::info!("📇 Indexes ensured on '{}'", MATCHES_COLLECTION);
    Ok(())
}
