use crate::aggregate::aggregate_partial;
use crate::factors::EmissionFactorTable;
use crate::goal;
use crate::models::{AggregateResult, Category, DegradedCategory, EmissionReport, Period};
use crate::score::{classify, share_message};
use crate::source::{ActivityRecordSource, SessionCredential};
use futures::future::join_all;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub struct GenerationTracker {
    latest: AtomicU64,
}

impl GenerationTracker {
    pub fn begin(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == generation
    }
}

pub struct AggregationPipeline<S: ?Sized> {
    source: Arc<S>,
    table: EmissionFactorTable,
}

impl<S: ?Sized> Clone for AggregationPipeline<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            table: self.table.clone(),
        }
    }
}

impl<S: ActivityRecordSource + ?Sized> AggregationPipeline<S> {
    pub fn new(source: Arc<S>, table: EmissionFactorTable) -> Self {
        Self { source, table }
    }

    pub fn table(&self) -> &EmissionFactorTable {
        &self.table
    }

    pub async fn aggregate(&self, credential: &SessionCredential, period: Period) -> AggregateResult {
        let fetches = Category::ALL.map(|category| async move {
            (category, self.source.fetch(credential, category, period).await)
        });

        let mut records = Vec::new();
        let mut degraded = Vec::new();
        for (category, result) in join_all(fetches).await {
            match result {
                Ok(mut fetched) => records.append(&mut fetched),
                Err(err) => {
                    warn!(%category, %period, "category degraded: {err}");
                    degraded.push(DegradedCategory {
                        category,
                        reason: err.to_string(),
                    });
                }
            }
        }

        aggregate_partial(&self.table, &records, period, degraded)
    }

    pub async fn report(
        &self,
        credential: &SessionCredential,
        period: Period,
        goal_kg: Option<f64>,
    ) -> EmissionReport {
        build_report(self.aggregate(credential, period).await, goal_kg)
    }

    // `None` when a newer request began on `tracker` before this one finished.
    pub async fn latest_report(
        &self,
        tracker: &GenerationTracker,
        credential: &SessionCredential,
        period: Period,
        goal_kg: Option<f64>,
    ) -> Option<EmissionReport> {
        let generation = tracker.begin();
        let report = self.report(credential, period, goal_kg).await;
        if tracker.is_current(generation) {
            Some(report)
        } else {
            debug!(%period, generation, "dropping superseded report");
            None
        }
    }
}

pub fn build_report(aggregate: AggregateResult, goal_kg: Option<f64>) -> EmissionReport {
    let band = classify(aggregate.total);
    EmissionReport {
        band,
        alert: goal::evaluate(aggregate.total, goal_kg),
        share_message: share_message(aggregate.period, aggregate.total, band),
        aggregate,
    }
}
