pub mod assessment;
pub mod config;
pub mod filter;

pub use assessment::{assess, Assessment, GateFailure};
pub use config::{EligibilityConfig, PointsGate};
pub use filter::{filter_eligible_degrees, filter_with_config, is_eligible};
