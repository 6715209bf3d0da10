use std::sync::Arc;

use crate::database::store::MatchStore;
use crate::errors::AppError;
use crate::models::sports_match::{SportsMatch, UpsertOutcome};

#[derive(Debug)]
pub struct RecordOutcome {
    pub match_id: String,
    pub result: Result<UpsertOutcome, AppError>,
}

/// Per-record results of one batch, in the order the records were given.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub outcomes: Vec<RecordOutcome>,
}

impl ReconcileReport {
    pub fn inserted(&self) -> usize {
        self.count(UpsertOutcome::Inserted)
    }

    pub fn updated(&self) -> usize {
        self.count(UpsertOutcome::Updated)
    }

    pub fn reconciled(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &AppError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.match_id.as_str(), e)))
    }

    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }

    fn count(&self, wanted: UpsertOutcome) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.result, Ok(outcome) if outcome == wanted))
            .count()
    }
}

#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn MatchStore>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn MatchStore>) -> Self {
        Self { store }
    }

    /// Upserts every record independently. A failed record is reported and the batch
    /// moves on; retrying is left to the next cycle.
    pub async fn reconcile(&self, records: &[SportsMatch]) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        for record in records {
            let result = self.store.upsert(record).await;
            if let Err(e) = &result {
                tracing::error!("Failed to upsert {}: {}", record.match_id, e);
            }
            report.outcomes.push(RecordOutcome {
                match_id: record.match_id.clone(),
                result,
            });
        }

        report
    }
}
