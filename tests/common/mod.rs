//! In-memory fakes for the store and fetcher seams.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use live_sports_api::database::store::MatchStore;
use live_sports_api::errors::{AppError, Result};
use live_sports_api::models::sports_match::{SportsMatch, UpsertOutcome};
use live_sports_api::services::fetcher::{FetchError, Fetcher};

/// Keyed by `match_id`, mirroring the unique index on the real collection.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, SportsMatch>>,
    failing_ids: Mutex<HashSet<String>>,
    pub upsert_calls: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_on(&self, match_id: &str) {
        self.failing_ids.lock().unwrap().insert(match_id.to_string());
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn get(&self, match_id: &str) -> Option<SportsMatch> {
        self.records.lock().unwrap().get(match_id).cloned()
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn upsert(&self, record: &SportsMatch) -> Result<UpsertOutcome> {
        self.upsert_calls.lock().unwrap().push(record.match_id.clone());

        if self.failing_ids.lock().unwrap().contains(&record.match_id) {
            return Err(AppError::store(format!("write rejected for {}", record.match_id)));
        }

        let mut records = self.records.lock().unwrap();
        match records.get_mut(&record.match_id) {
            Some(existing) => {
                let id = existing.id;
                *existing = SportsMatch { id, ..record.clone() };
                Ok(UpsertOutcome::Updated)
            }
            None => {
                let stored = SportsMatch {
                    id: Some(bson::oid::ObjectId::new()),
                    ..record.clone()
                };
                records.insert(record.match_id.clone(), stored);
                Ok(UpsertOutcome::Inserted)
            }
        }
    }

    async fn find_by_status(&self, statuses: &[&str], limit: i64) -> Result<Vec<SportsMatch>> {
        let records = self.records.lock().unwrap();
        let mut found: Vec<SportsMatch> = records
            .values()
            .filter(|m| statuses.is_empty() || statuses.contains(&m.status.as_str()))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
        found.truncate(limit.max(0) as usize);
        Ok(found)
    }

    async fn find_by_match_id(&self, match_id: &str) -> Result<Option<SportsMatch>> {
        Ok(self.get(match_id))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// Replays scripted responses in order, then repeats the last one.
pub struct ScriptedFetcher {
    responses: Mutex<VecDeque<std::result::Result<String, FetchError>>>,
    last: Mutex<Option<String>>,
    pub calls: Mutex<Vec<tokio::time::Instant>>,
}

impl ScriptedFetcher {
    pub fn new(responses: Vec<std::result::Result<String, FetchError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            last: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_times(&self) -> Vec<tokio::time::Instant> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, _url: &str) -> std::result::Result<String, FetchError> {
        self.calls.lock().unwrap().push(tokio::time::Instant::now());

        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(body)) => {
                *self.last.lock().unwrap() = Some(body.clone());
                Ok(body)
            }
            Some(Err(e)) => Err(e),
            None => self
                .last
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| FetchError::Transport("script exhausted".into())),
        }
    }
}

pub fn scoreboard_page(fixtures: &[(&str, &str, &str, &str, &str)]) -> String {
    let body: String = fixtures
        .iter()
        .map(|(team_a, score_a, team_b, score_b, status)| {
            format!(
                r#"<section class="Scoreboard">
                  <div class="ScoreboardScoreCell__Time">{status}</div>
                  <img class="Logo" src="https://cdn.example.com/{team_a}.png?size=small">
                  <div class="ScoreCell__TeamName">{team_a}</div>
                  <div class="ScoreCell__Score">{score_a}</div>
                  <img class="Logo" src="https://cdn.example.com/{team_b}.png">
                  <div class="ScoreCell__TeamName">{team_b}</div>
                  <div class="ScoreCell__Score">{score_b}</div>
                </section>"#
            )
        })
        .collect();
    format!("<html><body>{}</body></html>", body)
}

pub fn record(team_a: &str, team_b: &str, status: &str, at: DateTime<Utc>) -> SportsMatch {
    SportsMatch {
        id: None,
        match_id: live_sports_api::services::extractor::match_id_for(team_a, team_b).unwrap(),
        team_a: team_a.to_string(),
        team_b: team_b.to_string(),
        logo_a: String::new(),
        logo_b: String::new(),
        score_a: Some(0),
        score_b: Some(0),
        status: status.to_string(),
        last_updated: at,
    }
}
