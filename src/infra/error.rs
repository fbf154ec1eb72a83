use std::{io, net::SocketAddr};

use thiserror::Error;

/// Failures raised while wiring the process: the Appwrite client, the
/// listener and the tracing subscriber.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("failed to build the appwrite http client")]
    HttpClient(#[source] reqwest::Error),
    #[error("failed to bind {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("http server stopped")]
    Serve(#[source] io::Error),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

impl InfraError {
    pub fn bind(addr: SocketAddr, source: io::Error) -> Self {
        Self::Bind { addr, source }
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }
}
