//! Application-level configuration.
//!
//! - [`OrchestratorParams`]: turn loop control (retry ceiling, timeouts, reply style)

pub mod orchestrator_params;

pub use orchestrator_params::OrchestratorParams;
