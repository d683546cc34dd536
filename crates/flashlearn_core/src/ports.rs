//! crates/flashlearn_core/src/ports.rs
//!
//! Defines the service contracts (traits) the core logic consumes.
//! These traits form the boundary of the hexagonal architecture, keeping the core
//! independent of where the local cache lives or how the host profile service is reached.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::UserProfile;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    /// The external service is unreachable or was never initialized.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl From<serde_json::Error> for PortError {
    fn from(e: serde_json::Error) -> Self {
        PortError::Unexpected(e.to_string())
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable key/value persistence on the client device.
#[async_trait]
pub trait LocalCache: Send + Sync {
    /// Reads the raw string stored under `key`, `None` when nothing was ever written.
    async fn read(&self, key: &str) -> PortResult<Option<String>>;

    /// Overwrites the value stored under `key`.
    async fn write(&self, key: &str, value: &str) -> PortResult<()>;
}

/// The remote key/value profile store and analytics sink provided by the embedding host.
#[async_trait]
pub trait ProfileService: Send + Sync {
    /// Completes the host handshake for `activity_id`. Called once before any other method.
    async fn ready(&self, activity_id: &str) -> PortResult<()>;

    async fn fetch_profile(&self) -> PortResult<UserProfile>;

    async fn get_property(&self, key: &str) -> PortResult<Option<Value>>;

    async fn set_property(&self, key: &str, value: Value) -> PortResult<()>;

    async fn track_event(&self, event_name: &str, payload: Value) -> PortResult<()>;
}
