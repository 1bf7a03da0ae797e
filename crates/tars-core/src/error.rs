//! Error taxonomy for consumed interfaces and configuration loading.

use crate::types::DeviceHandle;

/// Failures reported by (or about) the threat-detection source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("threat-detection source is not available")]
    Unavailable,

    #[error("activation handshake failed: {reason}")]
    Handshake { reason: String },

    #[error("threat query failed: {reason}")]
    Query { reason: String },

    #[error("weapon target lookup failed for device {device:?}")]
    WeaponLookup { device: DeviceHandle },
}

/// Configuration load failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Escalation notification delivery failure. Logged, never propagated out of a tick.
#[derive(Debug, thiserror::Error)]
#[error("listener {listener} rejected {token}: {reason}")]
pub struct ListenerError {
    pub listener: String,
    pub token: String,
    pub reason: String,
}
