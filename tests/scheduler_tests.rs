mod common;

use std::sync::Arc;
use std::time::Duration;

use live_sports_api::errors::AppError;
use live_sports_api::services::fetcher::FetchError;
use live_sports_api::services::reconciler::Reconciler;
use live_sports_api::services::scheduler::Scheduler;
use live_sports_api::services::scraper::LiveScraper;
use tokio_util::sync::CancellationToken;

use common::{scoreboard_page, MemoryStore, ScriptedFetcher};

const INTERVAL: Duration = Duration::from_secs(300);
// tokio's timer wheel rounds deadlines up to the next millisecond
const TIMER_SLACK: Duration = Duration::from_millis(2);

fn scheduler(fetcher: Arc<ScriptedFetcher>, store: Arc<MemoryStore>) -> Scheduler {
    Scheduler::new(
        LiveScraper::new(fetcher, "https://scores.example.com/soccer"),
        Reconciler::new(store),
        INTERVAL,
    )
}

#[tokio::test]
async fn scrape_keeps_identified_matches_only() {
    let page = format!(
        "{}{}",
        scoreboard_page(&[("Team A", "2", "Team B", "1", "Live")]),
        r#"<section class="Scoreboard"><div class="ScoreCell__TeamName">Solo United</div></section>"#
    );
    let fetcher = ScriptedFetcher::new(vec![Ok(page)]);
    let scraper = LiveScraper::new(fetcher, "https://scores.example.com/soccer");

    let extraction = scraper.scrape().await.unwrap();

    assert_eq!(extraction.records.len(), 1);
    let m = &extraction.records[0];
    assert_eq!(m.match_id, "match_team_a_team_b");
    assert_eq!((m.score_a, m.score_b), (Some(2), Some(1)));
    assert_eq!(m.status, "live");
    assert_eq!(m.logo_a, "https://cdn.example.com/Team A.png");
}

#[tokio::test]
async fn transport_failures_end_the_cycle_before_reconciling() {
    let store = MemoryStore::new();
    let fetcher = ScriptedFetcher::new(vec![Err(FetchError::Transport("503".into()))]);

    let err = scheduler(fetcher, store.clone()).run_cycle().await.unwrap_err();

    assert!(matches!(err, AppError::Transport(_)));
    assert!(store.upsert_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn a_cycle_reports_store_failures_without_failing() {
    let store = MemoryStore::new();
    store.fail_on("match_c_d");
    let page = scoreboard_page(&[
        ("A", "1", "B", "0", "live"),
        ("C", "0", "D", "0", "live"),
        ("E", "x", "F", "y", ""),
    ]);
    let fetcher = ScriptedFetcher::new(vec![Ok(page)]);

    let report = scheduler(fetcher, store.clone()).run_cycle().await.unwrap();

    assert_eq!(report.extracted, 3);
    assert_eq!(report.reconcile.reconciled(), 2);
    let scheduled = store.get("match_e_f").unwrap();
    assert_eq!(scheduled.status, "scheduled");
    assert_eq!((scheduled.score_a, scheduled.score_b), (Some(0), Some(0)));
}

#[tokio::test(start_paused = true)]
async fn a_failed_cycle_is_followed_by_the_next_one_after_the_interval() {
    let store = MemoryStore::new();
    let page = scoreboard_page(&[("Team A", "0", "Team B", "0", "live")]);
    let fetcher = ScriptedFetcher::new(vec![
        Err(FetchError::Transport("connection reset".into())),
        Ok(page),
    ]);
    let scheduler = Arc::new(scheduler(fetcher.clone(), store.clone()));
    let shutdown = CancellationToken::new();

    let worker = tokio::spawn({
        let scheduler = scheduler.clone();
        let shutdown = shutdown.clone();
        async move { scheduler.run_forever(shutdown).await }
    });

    while fetcher.call_times().len() < 3 {
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
    shutdown.cancel();
    worker.await.unwrap();

    let calls = fetcher.call_times();
    for pair in calls.windows(2) {
        let gap = pair[1] - pair[0];
        assert!(gap >= INTERVAL && gap < INTERVAL + TIMER_SLACK, "gap was {:?}", gap);
    }
    assert_eq!(store.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn cancellation_interrupts_the_sleep() {
    let store = MemoryStore::new();
    let fetcher = ScriptedFetcher::new(vec![Ok(scoreboard_page(&[]))]);
    let scheduler = Arc::new(scheduler(fetcher.clone(), store));
    let shutdown = CancellationToken::new();

    let worker = tokio::spawn({
        let scheduler = scheduler.clone();
        let shutdown = shutdown.clone();
        async move { scheduler.run_forever(shutdown).await }
    });

    tokio::time::sleep(Duration::from_secs(10)).await;
    let cancelled_at = tokio::time::Instant::now();
    shutdown.cancel();
    worker.await.unwrap();

    assert_eq!(fetcher.call_times().len(), 1);
    assert!(tokio::time::Instant::now() - cancelled_at < INTERVAL);
}

#[tokio::test]
async fn a_cancelled_token_stops_before_the_first_cycle() {
    let fetcher = ScriptedFetcher::new(vec![]);
    let shutdown = CancellationToken::new();
    shutdown.cancel();

    scheduler(fetcher.clone(), MemoryStore::new()).run_forever(shutdown).await;

    assert!(fetcher.call_times().is_empty());
}
