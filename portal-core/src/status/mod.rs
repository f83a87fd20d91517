//! Game server status probe
//!
//! Independent of the data and auth layers: a single TCP connect attempt
//! bounded by a timeout. Any failure shows the fallback text.

use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerStatus {
    Online { latency: Duration },
    Unavailable { reason: String },
}

#[derive(Debug, Clone)]
pub struct StatusProbe {
    address: String,
    timeout: Duration,
    fallback: String,
}

impl StatusProbe {
    pub fn new(address: impl Into<String>, timeout: Duration, fallback: impl Into<String>) -> Self {
        StatusProbe {
            address: address.into(),
            timeout,
            fallback: fallback.into(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Try to open a connection to the server
    pub async fn probe(&self) -> ServerStatus {
        let started = Instant::now();
        let status = match timeout(self.timeout, TcpStream::connect(&self.address)).await {
            Ok(Ok(_stream)) => ServerStatus::Online {
                latency: started.elapsed(),
            },
            Ok(Err(e)) => ServerStatus::Unavailable {
                reason: e.to_string(),
            },
            Err(_) => ServerStatus::Unavailable {
                reason: format!("timed out after {:?}", self.timeout),
            },
        };
        debug!(address = %self.address, ?status, "server status probed");
        status
    }

    /// Text for the status widget
    pub fn display(&self, status: &ServerStatus) -> String {
        match status {
            ServerStatus::Online { latency } => format!("Online ({} ms)", latency.as_millis()),
            ServerStatus::Unavailable { .. } => self.fallback.clone(),
        }
    }
}
