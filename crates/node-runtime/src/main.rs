//! # Matrix Coordinator Node Runtime
//!
//! The main entry point for the shared matrix service.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (from `MC_*` environment)
//! 2. Load configuration (defaults, then environment overrides)
//! 3. Initialize subsystems (matrix core, then RPC gateway)
//! 4. Bind the RPC listener and serve
//! 5. On Ctrl+C, stop accepting connections and drain in-flight requests

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use mc_01_matrix_core::ports::inbound::MatrixCoordinationApi;
use mc_telemetry::{init_telemetry, TelemetryConfig};
use node_runtime::{NodeConfig, SubsystemContainer};

/// The main node runtime.
pub struct NodeRuntime {
    /// Subsystem container with all initialized services.
    container: Arc<SubsystemContainer>,
    /// Shutdown signal sender.
    shutdown_tx: tokio::sync::watch::Sender<bool>,
    /// Shutdown signal receiver.
    shutdown_rx: tokio::sync::watch::Receiver<bool>,
}

impl NodeRuntime {
    /// Create a new node runtime with configuration.
    pub fn new(config: NodeConfig) -> Result<Self> {
        info!("Creating matrix coordinator runtime");

        let container = Arc::new(
            SubsystemContainer::new(config).context("Failed to initialize subsystems")?,
        );
        let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

        Ok(Self {
            container,
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// Bind the RPC listener and spawn the server task.
    pub async fn start(&self) -> Result<tokio::task::JoinHandle<()>> {
        info!("===========================================");
        info!("  Matrix Coordinator v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        let listener = self
            .container
            .gateway
            .bind()
            .await
            .context("Failed to bind RPC listener")?;

        info!("RPC Addr: {}", self.container.config.gateway.http_addr());
        info!(
            "Max Batch: {}, Max Request: {} bytes",
            self.container.config.gateway.limits.max_batch_size,
            self.container.config.gateway.limits.max_request_size
        );

        let container = Arc::clone(&self.container);
        let mut shutdown_rx = self.shutdown_rx.clone();
        let handle = tokio::spawn(async move {
            let shutdown = async move {
                let _ = shutdown_rx.changed().await;
                info!("[mc-02] Shutdown signal received");
            };
            if let Err(e) = container.gateway.serve(listener, shutdown).await {
                error!(error = %e, "[mc-02] RPC gateway failed");
            }
        });

        Ok(handle)
    }

    /// Shutdown the node gracefully.
    pub async fn shutdown(&self, server: tokio::task::JoinHandle<()>) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        if let Err(e) = server.await {
            error!("RPC server task panicked: {}", e);
        }

        let shape = self.container.matrix.shape();
        info!(rows = shape.rows, columns = ?shape.columns, "Shutdown complete");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry = init_telemetry(TelemetryConfig::from_env())
        .context("Failed to initialize telemetry")?;

    let config = NodeConfig::from_env().context("Failed to load configuration")?;

    let runtime = NodeRuntime::new(config)?;
    let mut server = runtime.start().await?;

    info!("Node is running. Press Ctrl+C to stop.");
    let exited_early = tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for Ctrl+C")?;
            None
        }
        result = &mut server => Some(result),
    };

    if let Some(result) = exited_early {
        anyhow::bail!("RPC server exited unexpectedly: {:?}", result);
    }

    runtime.shutdown(server).await;
    Ok(())
}
