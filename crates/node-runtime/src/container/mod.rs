//! # Subsystem Container
//!
//! Central container holding the subsystem instances with lifetime
//! management and dependency injection.

pub mod config;
pub mod subsystems;

pub use config::{ConfigError, NodeConfig};
pub use subsystems::SubsystemContainer;
