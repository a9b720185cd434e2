use crate::body::ResponseBody;
use crate::codec::Codec;
use crate::service::{DEFAULT_CONTENT_TYPE, Responder};
use http::{HeaderValue, Response, StatusCode, header};
use pin_project_lite::pin_project;
use std::convert::Infallible;
use std::future::Future;
use std::io;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::fs::File;

const TEXT_PLAIN: &str = "text/plain; UTF-8";

type OpenFuture = Pin<Box<dyn Future<Output = Response<ResponseBody>> + Send>>;

pin_project! {
    /// Future for negotiating service responses.
    #[project = ResponseFutureProj]
    #[allow(missing_docs)]
    pub enum ResponseFuture {
        /// Response known without touching the filesystem.
        Ready {
            response: Option<Response<ResponseBody>>,
        },
        /// Opening and stat-ing the resolved file.
        Opening {
            future: OpenFuture,
        },
    }
}

impl ResponseFuture {
    pub(crate) fn ready(response: Response<ResponseBody>) -> Self {
        Self::Ready {
            response: Some(response),
        }
    }

    pub(crate) fn open(responder: Arc<Responder>, selected: Option<Codec>) -> Self {
        Self::Opening {
            future: Box::pin(async move { open_variant(&responder, selected).await }),
        }
    }
}

impl Future for ResponseFuture {
    type Output = Result<Response<ResponseBody>, Infallible>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project() {
            ResponseFutureProj::Ready { response } => Poll::Ready(Ok(response
                .take()
                .expect("ResponseFuture polled after completion"))),
            ResponseFutureProj::Opening { future } => future.as_mut().poll(cx).map(Ok),
        }
    }
}

/// Opens the resolved file and builds the 200 response, or the matching error response.
async fn open_variant(responder: &Responder, selected: Option<Codec>) -> Response<ResponseBody> {
    let path = responder.assets().resolve(selected);

    let file = match File::open(path).await {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return not_found(path),
        Err(err) => return internal_error(path, &err),
    };

    let metadata = match file.metadata().await {
        Ok(metadata) => metadata,
        Err(err) => return internal_error(path, &err),
    };

    if !metadata.is_file() {
        return not_found(path);
    }

    let len = metadata.len();
    let mut response = Response::new(ResponseBody::file(file, len, path));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(DEFAULT_CONTENT_TYPE),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));

    if let Some(codec) = selected {
        headers.insert(
            header::CONTENT_ENCODING,
            HeaderValue::from_static(codec.content_encoding()),
        );
    }

    // The body depends on Accept-Encoding whichever variant was picked.
    headers.insert(header::VARY, HeaderValue::from_static("accept-encoding"));

    response
}

pub(crate) fn method_not_allowed() -> Response<ResponseBody> {
    let status = StatusCode::METHOD_NOT_ALLOWED;
    let mut response = text_response(status, status.canonical_reason().unwrap_or_default());
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static("GET, OPTIONS"));
    response
}

fn not_found(path: &Path) -> Response<ResponseBody> {
    tracing::warn!(path = %path.display(), "resolved file is missing");
    text_response(
        StatusCode::NOT_FOUND,
        format!("Error: Requested file \"{}\" not found", path.display()),
    )
}

fn internal_error(path: &Path, err: &io::Error) -> Response<ResponseBody> {
    tracing::error!(path = %path.display(), error = %err, "failed to open resolved file");
    text_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Encountered internal server error while piping file: {err}"),
    )
}

fn text_response(status: StatusCode, body: impl Into<String>) -> Response<ResponseBody> {
    let body = body.into();
    let len = body.len();

    let mut response = Response::new(ResponseBody::full(body));
    *response.status_mut() = status;

    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    response
}
