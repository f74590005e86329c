//! Scan execution: HTTP plumbing and the orchestrator

pub mod fetcher;
mod orchestrator;

pub use orchestrator::{Orchestrator, Outcome, Progress, ScanReport};
