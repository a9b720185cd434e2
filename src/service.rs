use crate::assets::AssetPaths;
use crate::future::{self, ResponseFuture};
use crate::negotiate::{AcceptEncoding, EncodingPriority};
use http::{HeaderMap, Method, Request, header};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::Service;

/// Content-Type sent with the served asset.
pub const DEFAULT_CONTENT_TYPE: &str = "text/html; UTF-8";

/// Immutable per-process state shared by every request.
#[derive(Debug, Clone)]
pub struct Responder {
    priority: EncodingPriority,
    assets: AssetPaths,
}

impl Responder {
    /// Creates a responder from the priority list and the asset table.
    pub fn new(priority: EncodingPriority, assets: AssetPaths) -> Self {
        Self { priority, assets }
    }

    /// The on-disk asset table.
    pub fn assets(&self) -> &AssetPaths {
        &self.assets
    }
}

/// A Tower service that answers every request with the negotiated variant.
#[derive(Debug, Clone)]
pub struct NegotiatingService {
    responder: Arc<Responder>,
}

impl NegotiatingService {
    /// Creates a new service around shared responder state.
    pub fn new(responder: Responder) -> Self {
        Self {
            responder: Arc::new(responder),
        }
    }
}

impl<ReqBody> Service<Request<ReqBody>> for NegotiatingService {
    type Response = http::Response<crate::body::ResponseBody>;
    type Error = Infallible;
    type Future = ResponseFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let remote = req.extensions().get::<SocketAddr>().copied();
        tracing::debug!(method = %req.method(), remote = ?remote, "got request");

        if !is_allowed(req.method()) {
            return ResponseFuture::ready(future::method_not_allowed());
        }

        let accepted = accept_encoding(req.headers());
        let selected = self.responder.priority.negotiate(accepted.as_ref());
        let path = self.responder.assets.resolve(selected);

        match selected {
            Some(codec) => tracing::debug!(
                client = ?accepted.as_ref().map(AcceptEncoding::tokens),
                encoding = %codec,
                rank = self.responder.priority.rank(codec),
                of = self.responder.priority.len(),
                file = %path.display(),
                "agreed on encoding"
            ),
            None => tracing::debug!(
                client = ?accepted.as_ref().map(AcceptEncoding::tokens),
                file = %path.display(),
                "no common encoding, serving uncompressed"
            ),
        }

        ResponseFuture::open(self.responder.clone(), selected)
    }
}

fn is_allowed(method: &Method) -> bool {
    method == Method::GET || method == Method::OPTIONS
}

/// Collects every Accept-Encoding header into one token set.
fn accept_encoding(headers: &HeaderMap) -> Option<AcceptEncoding> {
    let values: Vec<&str> = headers
        .get_all(header::ACCEPT_ENCODING)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(AcceptEncoding::parse(&values.join(", ")))
    }
}
