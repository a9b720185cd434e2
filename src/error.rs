use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Startup and server-level failures.
///
/// Faults inside a single request never surface here; the service turns
/// them into HTTP responses instead.
#[derive(Debug, Error)]
pub enum Error {
    /// The source asset could not be read, so there is nothing to serve.
    #[error("failed to read source asset {}: {source}", path.display())]
    SourceUnreadable {
        /// Path of the source asset.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The listening socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Requested listen address.
        addr: SocketAddr,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A configured priority entry is not a supported content-encoding token.
    #[error("unsupported encoding in priority list: {0:?}")]
    InvalidPriority(String),
}
