pub mod classify;
pub mod constants;
pub mod error;
pub mod normalize;
pub mod types;

pub use classify::{Classified, Destination, Navigation, RouteTable, classify, percent_encode};
pub use error::{Error, Result};
pub use normalize::normalize;
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
