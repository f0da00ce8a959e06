//! # Node Configuration
//!
//! Unified configuration for the matrix core and the RPC gateway.
//!
//! Defaults first, then environment overrides:
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `MC_RPC_HOST` | `gateway.http.host` |
//! | `MC_RPC_PORT` | `gateway.http.port` |
//! | `MC_MAX_BATCH_SIZE` | `gateway.limits.max_batch_size` |
//! | `MC_MAX_REQUEST_SIZE` | `gateway.limits.max_request_size` |
//! | `MC_RANK_TOLERANCE` | `matrix.rank_tolerance` |
//! | `MC_SVD_MAX_ITERATIONS` | `matrix.svd_max_iterations` |

use mc_01_matrix_core::MatrixConfig;
use mc_02_rpc_gateway::GatewayConfig;
use std::str::FromStr;

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// Matrix core configuration.
    pub matrix: MatrixConfig,
    /// RPC gateway configuration.
    pub gateway: GatewayConfig,
}

impl NodeConfig {
    /// Load defaults plus overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load defaults plus overrides from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = parse_var(&lookup, "MC_RPC_HOST")? {
            config.gateway.http.host = host;
        }
        if let Some(port) = parse_var(&lookup, "MC_RPC_PORT")? {
            config.gateway.http.port = port;
        }
        if let Some(max) = parse_var(&lookup, "MC_MAX_BATCH_SIZE")? {
            config.gateway.limits.max_batch_size = max;
        }
        if let Some(max) = parse_var(&lookup, "MC_MAX_REQUEST_SIZE")? {
            config.gateway.limits.max_request_size = max;
        }
        if let Some(tolerance) = parse_var::<f64, _>(&lookup, "MC_RANK_TOLERANCE")? {
            if !tolerance.is_finite() || tolerance < 0.0 {
                return Err(ConfigError::InvalidValue {
                    var: "MC_RANK_TOLERANCE",
                    value: tolerance.to_string(),
                    reason: "must be a finite, non-negative number".into(),
                });
            }
            config.matrix.rank_tolerance = Some(tolerance);
        }
        if let Some(iterations) = parse_var(&lookup, "MC_SVD_MAX_ITERATIONS")? {
            config.matrix.svd_max_iterations = iterations;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the combined configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gateway.validate()?;
        if self.matrix.svd_max_iterations == 0 {
            return Err(ConfigError::InvalidValue {
                var: "MC_SVD_MAX_ITERATIONS",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            var,
            value: raw.clone(),
            reason: e.to_string(),
        })
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment override could not be used.
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    /// Gateway settings failed validation.
    #[error(transparent)]
    Gateway(#[from] mc_02_rpc_gateway::ConfigError),
}
