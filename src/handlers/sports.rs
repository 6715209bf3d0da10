use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::errors::{AppError, Result};
use crate::models::sports_match::{
    CreateSportsMatch, SportsMatch, SportsMatchView, SportsQuery, STATUS_LIVE, STATUS_SCHEDULED,
    STATUS_UPCOMING,
};
use crate::services::extractor::{clean_logo_url, match_id_for};
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

async fn list_by_status(state: &AppState, statuses: &[&str], limit: Option<i64>) -> Result<Json<Vec<SportsMatchView>>> {
    let start_time = std::time::Instant::now();
    let limit = clamp_limit(limit);

    let matches = state.store.find_by_status(statuses, limit).await?;

    tracing::info!(
        "✅ Fetched {} matches for {:?} (limit {}) in {:?}",
        matches.len(),
        statuses,
        limit,
        start_time.elapsed()
    );
    Ok(Json(matches.into_iter().map(SportsMatchView::from).collect()))
}

pub async fn get_live_sports(
    State(state): State<AppState>,
    query: std::result::Result<Query<LimitQuery>, QueryRejection>,
) -> Result<Json<Vec<SportsMatchView>>> {
    let Query(query) = query?;
    list_by_status(&state, &[STATUS_LIVE], query.limit).await
}

// The scraper records fixtures without a status node as "scheduled"
pub async fn get_upcoming_sports(
    State(state): State<AppState>,
    query: std::result::Result<Query<LimitQuery>, QueryRejection>,
) -> Result<Json<Vec<SportsMatchView>>> {
    let Query(query) = query?;
    list_by_status(&state, &[STATUS_UPCOMING, STATUS_SCHEDULED], query.limit).await
}

pub async fn get_sports(
    State(state): State<AppState>,
    query: std::result::Result<Query<SportsQuery>, QueryRejection>,
) -> Result<Json<Vec<SportsMatchView>>> {
    let Query(query) = query?;
    let status = query.status.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());
    match status.as_deref() {
        Some(status) => list_by_status(&state, &[status], query.limit).await,
        None => list_by_status(&state, &[], query.limit).await,
    }
}

pub async fn get_sports_match(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<SportsMatchView>> {
    match state.store.find_by_match_id(&match_id).await? {
        Some(found) => Ok(Json(found.into())),
        None => {
            tracing::info!("❌ Match not found: {}", match_id);
            Err(AppError::DocumentNotFound)
        }
    }
}

pub async fn add_sports_match(
    State(state): State<AppState>,
    Json(payload): Json<CreateSportsMatch>,
) -> Result<Json<Value>> {
    payload.validate()?;

    let team_a = payload.team_a.trim().to_string();
    let team_b = payload.team_b.trim().to_string();
    if team_a.is_empty() || team_b.is_empty() {
        return Err(AppError::invalid_data("team_a and team_b must not be blank"));
    }

    let match_id = resolve_match_id(payload.match_id.as_deref(), &team_a, &team_b)?;

    let record = SportsMatch {
        id: None,
        match_id,
        team_a,
        team_b,
        logo_a: payload.logo_a.as_deref().map(clean_logo_url).unwrap_or_default(),
        logo_b: payload.logo_b.as_deref().map(clean_logo_url).unwrap_or_default(),
        score_a: payload.score_a,
        score_b: payload.score_b,
        status: payload
            .status
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| STATUS_SCHEDULED.to_string()),
        last_updated: Utc::now(),
    };

    let outcome = state.store.upsert(&record).await?;
    tracing::info!("📝 Manual upsert of {}: {:?}", record.match_id, outcome);

    Ok(Json(json!({
        "ok": true,
        "message": "Sports match added/updated successfully",
        "match_id": record.match_id,
        "outcome": outcome,
    })))
}

/// An explicit id wins, but one that differs from the pairing's derived id creates a
/// document the scraper will never refresh.
fn resolve_match_id(explicit: Option<&str>, team_a: &str, team_b: &str) -> Result<String> {
    let derived = match_id_for(team_a, team_b);

    match explicit.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => {
            if let Ok(derived) = &derived {
                if derived != id {
                    tracing::warn!(
                        "⚠️ match_id '{}' differs from '{}' derived for {} vs {}; the scraper will track them separately",
                        id,
                        derived,
                        team_a,
                        team_b
                    );
                }
            }
            Ok(id.to_string())
        }
        None => derived.map_err(|e| AppError::invalid_data(e.to_string())),
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "time": Utc::now().to_rfc3339(),
    }))
}

pub async fn api_health(State(state): State<AppState>) -> Json<Value> {
    let db_status = match state.store.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!("Store ping failed: {}", e);
            "disconnected"
        }
    };

    Json(json!({
        "status": "healthy",
        "database": db_status,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
