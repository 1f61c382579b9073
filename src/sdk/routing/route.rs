use super::coord::Coord;
use super::destination::Destination;
use super::error::{FailureKind, RoutingError};
use super::provider::types::DirectionsSummary;
use super::service::RoutingProvider;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Distance and toll for one destination. Failed queries produce
/// [`RouteResult::ZERO`], never an absent value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub distance_km: f64,
    /// ORS has no toll data, so this stays `0`.
    pub toll_price: f64,
}

impl RouteResult {
    pub const ZERO: RouteResult = RouteResult {
        distance_km: 0.0,
        toll_price: 0.0,
    };

    pub fn from_summary(summary: &DirectionsSummary) -> Self {
        Self {
            distance_km: meters_to_km(summary.distance),
            toll_price: 0.0,
        }
    }
}

/// Meters to kilometers, rounded half away from zero to one decimal.
/// Negative and non-finite inputs give `0`.
pub fn meters_to_km(meters: f64) -> f64 {
    if !meters.is_finite() || meters <= 0.0 {
        return 0.0;
    }
    (meters / 100.0).round() / 10.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RouteOutcome {
    Computed,
    Fallback { kind: FailureKind, reason: String },
}

impl RouteOutcome {
    pub fn is_computed(&self) -> bool {
        matches!(self, RouteOutcome::Computed)
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            RouteOutcome::Computed => None,
            RouteOutcome::Fallback { kind, .. } => Some(*kind),
        }
    }
}

/// A result together with how it was obtained, so a computed zero can be
/// told apart from a fallback zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteReport {
    pub result: RouteResult,
    pub outcome: RouteOutcome,
}

impl RouteReport {
    pub fn computed(result: RouteResult) -> Self {
        Self {
            result,
            outcome: RouteOutcome::Computed,
        }
    }

    pub fn fallback(err: &RoutingError) -> Self {
        Self {
            result: RouteResult::ZERO,
            outcome: RouteOutcome::Fallback {
                kind: err.kind(),
                reason: err.to_string(),
            },
        }
    }
}

/// Single-attempt lorry route lookup from the depot to one destination.
#[derive(Clone)]
pub struct RouteQuery {
    provider: Arc<dyn RoutingProvider>,
    depot: Coord,
}

impl RouteQuery {
    pub fn new(provider: Arc<dyn RoutingProvider>, depot: Coord) -> Self {
        Self { provider, depot }
    }

    pub fn depot(&self) -> Coord {
        self.depot
    }

    /// Runs the precondition checks and at most one provider call.
    pub async fn try_route(&self, destination: &Destination) -> Result<RouteResult, RoutingError> {
        if !self.provider.has_credentials() {
            return Err(RoutingError::MissingApiKey);
        }
        let end = destination
            .coordinates()
            .ok_or_else(|| RoutingError::MissingCoordinates {
                location: label(destination).to_string(),
            })?;

        let summary = self.provider.get_directions(self.depot, end).await?;
        Ok(RouteResult::from_summary(&summary))
    }

    /// Like [`RouteQuery::try_route`], but every failure is logged and turned
    /// into the zero fallback.
    pub async fn query(&self, destination: &Destination) -> RouteReport {
        match self.try_route(destination).await {
            Ok(result) => {
                log::debug!(
                    "Route to {} is {:.1} km",
                    label(destination),
                    result.distance_km
                );
                RouteReport::computed(result)
            }
            Err(err) => {
                log_failure(destination, &err);
                RouteReport::fallback(&err)
            }
        }
    }

    pub async fn calculate_route_for_lorry(&self, destination: &Destination) -> RouteResult {
        self.query(destination).await.result
    }

    #[deprecated(note = "use calculate_route_for_lorry")]
    pub async fn calculate_toll_price(&self, destination: &Destination) -> f64 {
        self.calculate_route_for_lorry(destination).await.toll_price
    }
}

pub(crate) fn label(destination: &Destination) -> &str {
    if destination.location.trim().is_empty() {
        &destination.id
    } else {
        &destination.location
    }
}

fn log_failure(destination: &Destination, err: &RoutingError) {
    let name = label(destination);
    match err.kind() {
        FailureKind::Configuration => log::warn!("OpenRouteService API key not configured"),
        FailureKind::Input => log::warn!("No coordinates for destination: {}", name),
        FailureKind::RateLimited => log::warn!(
            "OpenRouteService rate limit exceeded for {}. Please wait before retrying.",
            name
        ),
        FailureKind::NoRoute => log::warn!("No route found for destination: {}", name),
        _ => log::error!("Error calculating route for {}: {}", name, err),
    }
}
