pub mod config;
pub mod domain;
pub mod eligibility;
pub mod output;
mod persist;
pub mod profile;
pub mod scoring;
pub mod telemetry;
pub mod tracker;
