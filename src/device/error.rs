use thiserror::Error;

/// Connectivity failures and protocol failures are distinct on purpose: the
/// former aborts a sync, the latter only degrades it to an empty fetch.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("cannot reach device at {addr}: {reason}")]
    Connect { addr: String, reason: String },

    #[error("device call failed: {0}")]
    Protocol(String),

    #[error("no open session with the device")]
    NotConnected,
}

impl DeviceError {
    pub fn is_connectivity(&self) -> bool {
        matches!(self, DeviceError::Connect { .. } | DeviceError::NotConnected)
    }
}
