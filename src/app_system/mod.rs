//! System orchestration, startup, and shutdown logic.

pub mod retail_system;
pub mod telemetry;

pub use retail_system::*;
pub use telemetry::*;
