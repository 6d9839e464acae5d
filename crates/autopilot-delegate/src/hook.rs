//! Deployment-specific removal hooks

use async_trait::async_trait;
use steward_autopilot::Server;

use crate::error::BoxError;

/// Extra cleanup run after a failed server left both gossip pools.
#[async_trait]
pub trait RemovalHook: Send + Sync + 'static {
    /// Performs the cleanup. Errors are returned to the control loop unchanged.
    async fn remove_failed_server(&self, server: &Server) -> Result<(), BoxError>;
}

/// Hook that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopRemovalHook;

#[async_trait]
impl RemovalHook for NoopRemovalHook {
    async fn remove_failed_server(&self, _server: &Server) -> Result<(), BoxError> {
        Ok(())
    }
}
