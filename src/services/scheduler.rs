use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::errors::Result;
use crate::services::reconciler::{ReconcileReport, Reconciler};
use crate::services::scraper::LiveScraper;

#[derive(Debug)]
pub struct CycleReport {
    pub extracted: usize,
    pub skipped: usize,
    pub reconcile: ReconcileReport,
}

/// Drives scrape → reconcile on a fixed cadence from a single background task.
pub struct Scheduler {
    scraper: LiveScraper,
    reconciler: Reconciler,
    interval: Duration,
}

impl Scheduler {
    pub fn new(scraper: LiveScraper, reconciler: Reconciler, interval: Duration) -> Self {
        Self {
            scraper,
            reconciler,
            interval,
        }
    }

    /// One full fetch → extract → reconcile pass. Only a fetch failure is returned as
    /// an error; per-record store failures live in the report.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let extraction = self.scraper.scrape().await?;
        let reconcile = self.reconciler.reconcile(&extraction.records).await;

        Ok(CycleReport {
            extracted: extraction.records.len(),
            skipped: extraction.skipped.len(),
            reconcile,
        })
    }

    /// Loops until `shutdown` is cancelled. Cycles never overlap, and the sleep between
    /// them is always the full interval regardless of how long the cycle took.
    pub async fn run_forever(&self, shutdown: CancellationToken) {
        tracing::info!(
            "🕑 Scheduler started: scraping {} every {:?}",
            self.scraper.url(),
            self.interval
        );

        while !shutdown.is_cancelled() {
            match self.run_cycle().await {
                Ok(report) if report.reconcile.is_clean() => {
                    tracing::info!(
                        "✅ {} matches reconciled ({} inserted, {} updated, {} containers skipped)",
                        report.reconcile.reconciled(),
                        report.reconcile.inserted(),
                        report.reconcile.updated(),
                        report.skipped
                    );
                }
                Ok(report) => {
                    let failed = report.reconcile.failures().count();
                    let first = report
                        .reconcile
                        .failures()
                        .next()
                        .map(|(id, e)| format!("{}: {}", id, e))
                        .unwrap_or_default();
                    tracing::warn!(
                        "⚠️ {} of {} matches reconciled, {} failed (first: {})",
                        report.reconcile.reconciled(),
                        report.extracted,
                        failed,
                        first
                    );
                }
                Err(e) => {
                    tracing::warn!("❌ Scrape cycle failed: {}", e);
                }
            }

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        tracing::info!("🛑 Scheduler stopped");
    }
}
