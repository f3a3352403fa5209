pub mod adapter;
pub mod error;
pub mod link;
pub mod memory;

pub use adapter::TerminalAdapter;
pub use error::DeviceError;
pub use link::{DeviceInfo, DeviceLink, DeviceUser, PunchEvent};

/// Builds a fresh vendor link for a terminal address. Injected at startup so
/// handlers never care which [`DeviceLink`] implementation is wired in.
pub type LinkFactory =
    std::sync::Arc<dyn Fn(&str, u16) -> Box<dyn DeviceLink> + Send + Sync>;
