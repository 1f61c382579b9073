pub mod batch;
pub mod coord;
pub mod destination;
pub mod error;
pub mod provider;
pub mod route;
pub mod service;

pub use batch::{BatchOrchestrator, BatchReport, BatchResult, BatchStatus, Diagnostic};
pub use coord::{Axis, Coord, ORS_AXIS_ORDER};
pub use destination::{load_destinations, read_destinations, CoordinateValue, Destination};
pub use error::{FailureKind, RoutingError};
pub use provider::RemoteOrsProvider;
pub use route::{meters_to_km, RouteOutcome, RouteQuery, RouteReport, RouteResult};
pub use service::RoutingProvider;
