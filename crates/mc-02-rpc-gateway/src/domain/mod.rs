//! Domain types for the RPC gateway: configuration, errors and the method table.

pub mod config;
pub mod error;
pub mod methods;

pub use config::{ConfigError, GatewayConfig, HttpConfig, LimitsConfig};
pub use error::{ApiError, ApiResult, GatewayError};
pub use methods::{get_method_info, is_method_supported, MatrixMethod, MethodInfo};
