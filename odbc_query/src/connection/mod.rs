pub mod tcp;

pub use tcp::TcpConnection;

use crate::config::Configuration;
use crate::error::TransportError;

/// Synchronous request/response channel to the server.
///
/// `sync_message` sends one encoded request and blocks until the matching
/// response frame arrives or `timeout_secs` elapses (`0` waits forever).
/// Implementations serialize concurrent callers.
pub trait Connection: Send + Sync {
    fn configuration(&self) -> &Configuration;

    fn schema(&self) -> String {
        self.configuration().schema().to_string()
    }

    fn sync_message(&self, request: &[u8], timeout_secs: u32) -> Result<Vec<u8>, TransportError>;
}

/// Transport timeout for a request carrying `query_timeout`: one extra
/// second so the server reports its own timeout first. `0` stays unbounded.
pub fn connection_timeout(query_timeout: u32) -> u32 {
    if query_timeout == 0 {
        0
    } else {
        query_timeout.saturating_add(1)
    }
}
