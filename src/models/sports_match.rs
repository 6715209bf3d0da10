use bson::{oid::ObjectId, serde_helpers::chrono_datetime_as_bson_datetime};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const STATUS_LIVE: &str = "live";
pub const STATUS_UPCOMING: &str = "upcoming";
pub const STATUS_SCHEDULED: &str = "scheduled";

// One observed fixture, as stored in the `sports_matches` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportsMatch {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub match_id: String,
    pub team_a: String,
    pub team_b: String,

    #[serde(default)]
    pub logo_a: String,
    #[serde(default)]
    pub logo_b: String,

    #[serde(default)]
    pub score_a: Option<i32>,
    #[serde(default)]
    pub score_b: Option<i32>,

    pub status: String, // "live", "scheduled"/"upcoming", "finished", ...

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub last_updated: DateTime<Utc>,
}

// Manual upsert payload for POST /sports
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSportsMatch {
    pub match_id: Option<String>,
    #[validate(length(min = 1, message = "team_a is required"))]
    pub team_a: String,
    #[validate(length(min = 1, message = "team_b is required"))]
    pub team_b: String,
    pub logo_a: Option<String>,
    pub logo_b: Option<String>,
    pub score_a: Option<i32>,
    pub score_b: Option<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SportsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

/// JSON shape returned by the read endpoints: string `_id`, RFC 3339 timestamps.
#[derive(Debug, Serialize, Deserialize)]
pub struct SportsMatchView {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub match_id: String,
    pub team_a: String,
    pub team_b: String,
    pub logo_a: String,
    pub logo_b: String,
    pub score_a: Option<i32>,
    pub score_b: Option<i32>,
    pub status: String,
    pub last_updated: DateTime<Utc>,
}

impl From<SportsMatch> for SportsMatchView {
    fn from(m: SportsMatch) -> Self {
        SportsMatchView {
            id: m.id.map(|oid| oid.to_hex()),
            match_id: m.match_id,
            team_a: m.team_a,
            team_b: m.team_b,
            logo_a: m.logo_a,
            logo_b: m.logo_b,
            score_a: m.score_a,
            score_b: m.score_b,
            status: m.status,
            last_updated: m.last_updated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}
