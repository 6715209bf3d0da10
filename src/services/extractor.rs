//! Scoreboard HTML → [`SportsMatch`] records.
//!
//! The page markup is not under our control, so every field degrades to a default
//! instead of failing. A container is only dropped when the match cannot be identified,
//! and each drop is reported as an [`ItemError`] next to the records that did parse.

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use crate::errors::{AppError, Result};
use crate::models::sports_match::{SportsMatch, STATUS_SCHEDULED};

/// CSS selectors locating each part of a fixture on the scoreboard page.
#[derive(Debug, Clone)]
pub struct ScoreboardSelectors {
    pub container: Selector,
    pub team: Selector,
    pub score: Selector,
    pub status: Selector,
    pub logo: Selector,
}

impl ScoreboardSelectors {
    pub fn new(container: &str, team: &str, score: &str, status: &str, logo: &str) -> Result<Self> {
        Ok(Self {
            container: parse_selector(container)?,
            team: parse_selector(team)?,
            score: parse_selector(score)?,
            status: parse_selector(status)?,
            logo: parse_selector(logo)?,
        })
    }
}

impl Default for ScoreboardSelectors {
    /// ESPN scoreboard markup.
    fn default() -> Self {
        // constant selectors, known to parse
        Self::new(
            ".Scoreboard",
            ".ScoreCell__TeamName",
            ".ScoreCell__Score",
            ".ScoreboardScoreCell__Time",
            "img.Logo",
        )
        .expect("built-in scoreboard selectors are valid")
    }
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| AppError::configuration(format!("invalid selector '{}': {}", css, e)))
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemErrorKind {
    #[error("expected two team names, found {found}")]
    MissingTeams { found: usize },

    #[error("team name '{name}' has no usable characters for an identifier")]
    UnidentifiableTeam { name: String },
}

/// A container that was skipped, with its position on the page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("container #{index} skipped: {kind}")]
pub struct ItemError {
    pub index: usize,
    pub kind: ItemErrorKind,
}

#[derive(Debug, Default)]
pub struct Extraction {
    pub records: Vec<SportsMatch>,
    pub skipped: Vec<ItemError>,
}

pub fn extract(raw: &str, selectors: &ScoreboardSelectors) -> Extraction {
    extract_at(raw, selectors, Utc::now())
}

/// Same as [`extract`] with an explicit `last_updated` stamp.
pub fn extract_at(raw: &str, selectors: &ScoreboardSelectors, now: DateTime<Utc>) -> Extraction {
    let document = Html::parse_document(raw);
    let mut extraction = Extraction::default();

    for (index, container) in document.select(&selectors.container).enumerate() {
        match extract_container(container, selectors, now) {
            Ok(record) => extraction.records.push(record),
            Err(kind) => {
                tracing::debug!("Skipping scoreboard container #{}: {}", index, kind);
                extraction.skipped.push(ItemError { index, kind });
            }
        }
    }

    extraction
}

fn extract_container(
    container: ElementRef<'_>,
    selectors: &ScoreboardSelectors,
    now: DateTime<Utc>,
) -> std::result::Result<SportsMatch, ItemErrorKind> {
    let teams: Vec<String> = container
        .select(&selectors.team)
        .map(element_text)
        .filter(|name| !name.is_empty())
        .take(2)
        .collect();

    let [team_a, team_b] = <[String; 2]>::try_from(teams)
        .map_err(|found| ItemErrorKind::MissingTeams { found: found.len() })?;

    let match_id = match_id_for(&team_a, &team_b)?;

    let mut scores = container
        .select(&selectors.score)
        .map(|el| parse_score(&element_text(el)));
    let score_a = scores.next();
    let score_b = scores.next();

    let status = container
        .select(&selectors.status)
        .next()
        .map(|el| element_text(el).to_lowercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| STATUS_SCHEDULED.to_string());

    let mut logos = container.select(&selectors.logo).map(|img| {
        let value = img.value();
        value
            .attr("src")
            .filter(|src| !src.trim().is_empty())
            .or_else(|| value.attr("data-src"))
            .map(clean_logo_url)
            .unwrap_or_default()
    });
    let logo_a = logos.next().unwrap_or_default();
    let logo_b = logos.next().unwrap_or_default();

    Ok(SportsMatch {
        id: None,
        match_id,
        team_a,
        team_b,
        logo_a,
        logo_b,
        score_a,
        score_b,
        status,
        last_updated: now,
    })
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// `0` unless the text is a plain non-negative integer literal.
pub fn parse_score(raw: &str) -> i32 {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    raw.parse().unwrap_or(0)
}

/// Drops the query string: `https://x.com/logo.png?v=2` → `https://x.com/logo.png`.
pub fn clean_logo_url(raw: &str) -> String {
    let raw = raw.trim();
    match raw.split_once('?') {
        Some((prefix, _)) => prefix.to_string(),
        None => raw.to_string(),
    }
}

/// Lower-cases and joins alphanumeric runs with `_`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

/// Stable identity of a fixture, derived from the team pairing only.
pub fn match_id_for(team_a: &str, team_b: &str) -> std::result::Result<String, ItemErrorKind> {
    let slug = |name: &str| {
        let slug = slugify(name);
        if slug.is_empty() {
            Err(ItemErrorKind::UnidentifiableTeam { name: name.to_string() })
        } else {
            Ok(slug)
        }
    };
    Ok(format!("match_{}_{}", slug(team_a)?, slug(team_b)?))
}
