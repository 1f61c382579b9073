use super::coord::Coord;
use super::error::RoutingError;
use super::provider::types::DirectionsSummary;
use async_trait::async_trait;

#[async_trait]
pub trait RoutingProvider: Send + Sync {
    /// Whether a credential is available. Queries are not attempted without
    /// one.
    fn has_credentials(&self) -> bool;

    /// Gets the lorry route summary between two points with a single
    /// request. An empty route list is reported as [`RoutingError::NoRoute`].
    async fn get_directions(
        &self,
        start: Coord,
        end: Coord,
    ) -> Result<DirectionsSummary, RoutingError>;
}
