//! Content-Encoding negotiation over pre-compressed static variants.
//!
//! At startup [`generate`] reads one source asset and writes a Brotli, Gzip
//! and Deflate copy next to it. [`NegotiatingService`] then answers every
//! request by picking an encoding from the client's `Accept-Encoding` header
//! and streaming the matching file.
//!
//! # Example
//!
//! ```ignore
//! use precompressed_responder::{AssetPaths, EncodingPriority, NegotiatingService, Responder};
//!
//! let assets = AssetPaths::new("test.html");
//! precompressed_responder::generate(&assets)?;
//!
//! let service = NegotiatingService::new(Responder::new(EncodingPriority::default(), assets));
//! let listener = precompressed_responder::server::bind(addr).await?;
//! precompressed_responder::server::serve(listener, service).await;
//! ```
//!
//! # Negotiation Rules
//!
//! - Only `GET` and `OPTIONS` are answered; anything else gets `405`
//! - The header is split on commas; tokens match literally, so quality
//!   values (`gzip;q=0.5`) are not understood and never match
//! - The server priority list decides, not the header order
//!   (default: `br`, `gzip`, `deflate`)
//! - No match, or no header, serves the uncompressed source
//! - A resolved file that is missing yields `404`; there is no fallback to
//!   another encoding
//!
//! # Response Headers
//!
//! - `Content-Type` is `text/html; UTF-8`
//! - `Content-Length` is the size of the file on disk
//! - `Content-Encoding` is set only when a variant was selected
//! - `Vary` is `accept-encoding`

#![deny(missing_docs)]

mod assets;
mod body;
mod codec;
pub mod config;
mod error;
mod future;
mod generate;
mod negotiate;
pub mod server;
mod service;

pub use assets::AssetPaths;
pub use body::ResponseBody;
pub use codec::Codec;
pub use error::Error;
pub use future::ResponseFuture;
pub use generate::{GenerationReport, generate};
pub use negotiate::{AcceptEncoding, EncodingPriority};
pub use service::{DEFAULT_CONTENT_TYPE, NegotiatingService, Responder};
