//! Command line and environment configuration.

use crate::assets::AssetPaths;
use crate::error::Error;
use crate::negotiate::EncodingPriority;
use clap::{Parser, ValueEnum};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8080;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Command line and environment configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "precompressed-responder", version, about)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "RESPONDER_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(short, long, env = "RESPONDER_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Uncompressed source asset; variants are written next to it.
    #[arg(short, long, env = "RESPONDER_SOURCE", default_value = "test.html")]
    pub source: PathBuf,

    /// Encodings in server preference order, highest first.
    #[arg(long, env = "RESPONDER_PRIORITY", default_value = "br,gzip,deflate")]
    pub priority: String,

    /// Log output format.
    #[arg(long, env = "RESPONDER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Config {
    /// Socket address to bind.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Parsed priority list.
    pub fn encoding_priority(&self) -> Result<EncodingPriority, Error> {
        EncodingPriority::from_tokens(&self.priority)
    }

    /// On-disk asset table derived from the source path.
    pub fn asset_paths(&self) -> AssetPaths {
        AssetPaths::new(&self.source)
    }
}
