use super::destination::Destination;
use super::error::RoutingError;
use super::provider::RemoteOrsProvider;
use super::route::{label, RouteOutcome, RouteQuery, RouteReport, RouteResult};
use super::service::RoutingProvider;
use crate::sdk::config::RoutingConfig;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::{BTreeMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Distance and toll per destination id. Always holds exactly one entry per
/// distinct input id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub distances: BTreeMap<String, f64>,
    pub toll_prices: BTreeMap<String, f64>,
}

impl BatchResult {
    fn record(&mut self, id: &str, result: RouteResult) {
        self.distances.insert(id.to_string(), result.distance_km);
        self.toll_prices.insert(id.to_string(), result.toll_price);
    }

    // Only fills ids that have no entry yet.
    fn record_skipped(&mut self, id: &str) {
        self.distances
            .entry(id.to_string())
            .or_insert(RouteResult::ZERO.distance_km);
        self.toll_prices
            .entry(id.to_string())
            .or_insert(RouteResult::ZERO.toll_price);
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub id: String,
    pub location: String,
    pub outcome: RouteOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum BatchStatus {
    Complete,
    /// Cancelled between destinations; `skipped` rows hold the zero
    /// fallback without having been queried.
    Cancelled { processed: usize, skipped: usize },
}

/// Everything a batch produced: the caller-facing mappings, one diagnostic
/// per input row in input order, and whether the batch ran to the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    #[serde(flatten)]
    pub result: BatchResult,
    pub diagnostics: Vec<Diagnostic>,
    pub status: BatchStatus,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.status == BatchStatus::Complete
    }

    pub fn computed(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.outcome.is_computed())
            .count()
    }
}

/// Queries destinations one at a time, in input order, waiting a fixed
/// delay between consecutive calls.
pub struct BatchOrchestrator {
    query: RouteQuery,
    delay: Duration,
}

impl BatchOrchestrator {
    pub fn new(query: RouteQuery, delay: Duration) -> Self {
        Self { query, delay }
    }

    pub fn from_config(provider: Arc<dyn RoutingProvider>, config: &RoutingConfig) -> Self {
        Self::new(
            RouteQuery::new(provider, config.depot),
            config.pacing_delay(),
        )
    }

    /// Orchestrator backed by the public ORS API.
    pub fn remote(config: &RoutingConfig) -> Result<Self, RoutingError> {
        let provider = RemoteOrsProvider::new(config)?;
        Ok(Self::from_config(Arc::new(provider), config))
    }

    pub fn query(&self) -> &RouteQuery {
        &self.query
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs one batch. Cancellation is checked before each destination and
    /// cuts the pacing delay short; a query already in flight finishes.
    /// Destinations not reached still get the zero fallback, and the status
    /// reports the batch as cancelled.
    pub async fn run(&self, destinations: &[Destination], cancel: &CancellationToken) -> BatchReport {
        let total = destinations.len();
        log::info!("Calculating lorry routes for {} destinations", total);

        let mut result = BatchResult::default();
        let mut diagnostics = Vec::with_capacity(total);
        let mut seen = HashSet::with_capacity(total);
        let mut processed = 0;

        for (i, destination) in destinations.iter().enumerate() {
            if cancel.is_cancelled() {
                break;
            }
            if !seen.insert(destination.id.as_str()) {
                log::warn!(
                    "Duplicate destination id {}; the later result replaces the earlier one",
                    destination.id
                );
            }

            let report = self.query_isolated(destination).await;
            result.record(&destination.id, report.result);
            diagnostics.push(Diagnostic {
                id: destination.id.clone(),
                location: destination.location.clone(),
                outcome: report.outcome,
            });
            processed += 1;

            if i + 1 < total {
                tokio::select! {
                    _ = cancel.cancelled() => {}
                    _ = tokio::time::sleep(self.delay) => {}
                }
            }
        }

        let skipped = total - processed;
        let status = if skipped == 0 {
            BatchStatus::Complete
        } else {
            log::warn!(
                "Batch cancelled after {} of {} destinations",
                processed,
                total
            );
            let cancelled = RouteReport::fallback(&RoutingError::Cancelled);
            for destination in &destinations[processed..] {
                result.record_skipped(&destination.id);
                diagnostics.push(Diagnostic {
                    id: destination.id.clone(),
                    location: destination.location.clone(),
                    outcome: cancelled.outcome.clone(),
                });
            }
            BatchStatus::Cancelled { processed, skipped }
        };

        let report = BatchReport {
            result,
            diagnostics,
            status,
        };
        log::info!(
            "Lorry routes done: {} computed, {} fell back",
            report.computed(),
            total - report.computed()
        );
        report
    }

    pub async fn calculate_routes_for_destinations(&self, destinations: &[Destination]) -> BatchResult {
        self.run(destinations, &CancellationToken::new()).await.result
    }

    #[deprecated(note = "use calculate_routes_for_destinations")]
    pub async fn calculate_toll_prices_for_destinations(
        &self,
        destinations: &[Destination],
    ) -> BTreeMap<String, f64> {
        self.calculate_routes_for_destinations(destinations)
            .await
            .toll_prices
    }

    // A panic while querying one destination is confined to that destination.
    async fn query_isolated(&self, destination: &Destination) -> RouteReport {
        match AssertUnwindSafe(self.query.query(destination))
            .catch_unwind()
            .await
        {
            Ok(report) => report,
            Err(why) => {
                let err = RoutingError::Unexpected(panic_message(why.as_ref()));
                log::error!(
                    "Failed to calculate route for {}: {}",
                    label(destination),
                    err
                );
                RouteReport::fallback(&err)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}
