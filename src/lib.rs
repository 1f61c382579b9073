pub mod sdk;

pub use sdk::config::RoutingConfig;
pub use sdk::routing::{
    BatchOrchestrator, BatchReport, BatchResult, Coord, Destination, RouteQuery, RouteResult,
    RoutingProvider,
};
