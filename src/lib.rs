pub mod config;
pub mod error;
pub mod geometry;
pub mod host;
pub mod math;
pub mod operations;
pub mod session;
pub mod store;
pub mod sync;
pub mod tessellation;

pub use config::SessionConfig;
pub use error::{CrosshairError, Result};
pub use session::{PlaneUpdate, TargetingSession, TrackingState, ViewMove};
