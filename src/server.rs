//! Connection handling: one task per accepted TCP connection.

use crate::error::Error;
use crate::service::NegotiatingService;
use http::Request;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use hyper_util::service::TowerToHyperService;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::pin;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceExt;

/// Pause after a failed accept, e.g. when the process is out of file descriptors.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Binds the listening socket.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, Error> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| Error::Bind { addr, source })
}

/// Serves connections forever.
pub async fn serve(listener: TcpListener, service: NegotiatingService) {
    serve_with_shutdown(listener, service, std::future::pending()).await
}

/// Serves connections until `signal` completes.
///
/// Connections already accepted keep running on their own tasks; only the
/// accept loop stops.
pub async fn serve_with_shutdown<F>(listener: TcpListener, service: NegotiatingService, signal: F)
where
    F: Future<Output = ()>,
{
    let mut signal = pin!(signal);

    loop {
        let (stream, remote) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to accept connection");
                    tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                    continue;
                }
            },
            () = &mut signal => {
                tracing::info!("shutdown signal received, no longer accepting connections");
                return;
            }
        };

        let io = TokioIo::new(stream);
        let service = service.clone().map_request(move |mut req: Request<Incoming>| {
            req.extensions_mut().insert(remote);
            req
        });

        tokio::spawn(async move {
            let service = TowerToHyperService::new(service);
            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                tracing::debug!(remote = %remote, error = %err, "error serving connection");
            }
        });
    }
}
