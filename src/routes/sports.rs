use axum::{routing::get, Router};

use crate::handlers::sports;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // GET /sports?status=finished&limit=20 - any status
        // POST /sports - manual upsert keyed by match_id
        .route("/", get(sports::get_sports).post(sports::add_sports_match))

        // GET /sports/live?limit=50
        .route("/live", get(sports::get_live_sports))

        // GET /sports/upcoming?limit=50 - "upcoming" and "scheduled"
        .route("/upcoming", get(sports::get_upcoming_sports))

        // GET /sports/match_arsenal_chelsea
        .route("/:match_id", get(sports::get_sports_match))
}
