pub mod config;
pub mod routing;
pub mod util;
