//! # Subsystem Container
//!
//! Holds the matrix core and the RPC gateway built on top of it.
//!
//! ```text
//! Level 0: Matrix Core (mc-01) - owns the matrix and client sessions
//! Level 1: RPC Gateway (mc-02) - shares the core through MatrixRequestHandler
//! ```
//!
//! The core is created exactly once per container and shared via `Arc`;
//! there is no process-wide matrix.

use std::sync::Arc;

use tracing::{info, instrument};

use mc_01_matrix_core::{MatrixCoordinationApi, MatrixCoordinationService, MatrixRequestHandler};
use mc_02_rpc_gateway::{GatewayError, RpcGatewayService};

use crate::container::config::NodeConfig;

/// Central container holding all subsystem instances.
pub struct SubsystemContainer {
    /// Matrix Core (Subsystem 1)
    pub matrix: Arc<MatrixCoordinationService>,

    /// RPC Gateway (Subsystem 2)
    pub gateway: RpcGatewayService,

    /// Node configuration
    pub config: NodeConfig,
}

impl SubsystemContainer {
    /// Create all subsystems in dependency order.
    #[instrument(skip_all, name = "subsystem_container_init")]
    pub fn new(config: NodeConfig) -> Result<Self, GatewayError> {
        info!("[mc-01] Initializing Matrix Core");
        let matrix = Arc::new(MatrixCoordinationService::with_config(config.matrix.clone()));

        info!("[mc-02] Initializing RPC Gateway");
        let handler =
            MatrixRequestHandler::from_service(Arc::clone(&matrix) as Arc<dyn MatrixCoordinationApi>);
        let gateway = RpcGatewayService::new(config.gateway.clone(), handler)?;

        info!(addr = %config.gateway.http_addr(), "All subsystems initialized");

        Ok(Self {
            matrix,
            gateway,
            config,
        })
    }
}
