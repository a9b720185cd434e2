use bytes::Bytes;
use http_body::{Body, Frame, SizeHint};
use pin_project_lite::pin_project;
use std::io;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll, ready};
use tokio::fs::File;
use tokio::io::{AsyncRead, ReadBuf};

const READ_BUFFER_SIZE: usize = 8 * 1024; // 8KB read buffer

pin_project! {
    /// A response body that is either held in memory or streamed from disk.
    #[project = ResponseBodyProj]
    #[allow(missing_docs)]
    pub enum ResponseBody {
        /// Small in-memory body such as an error message.
        Full {
            data: Option<Bytes>,
        },
        /// File contents read chunk by chunk.
        File {
            #[pin]
            file: File,
            buffer: Vec<u8>,
            remaining: u64,
            path: PathBuf,
        },
    }
}

impl ResponseBody {
    /// Creates a body from bytes already in memory.
    pub fn full(data: impl Into<Bytes>) -> Self {
        let data: Bytes = data.into();
        Self::Full {
            data: (!data.is_empty()).then_some(data),
        }
    }

    /// Streams `len` bytes from an open file.
    ///
    /// `len` must match the `Content-Length` already sent; a file that turns
    /// out shorter ends the stream with an error.
    pub fn file(file: File, len: u64, path: impl Into<PathBuf>) -> Self {
        Self::File {
            file,
            buffer: vec![0u8; READ_BUFFER_SIZE],
            remaining: len,
            path: path.into(),
        }
    }
}

impl Body for ResponseBody {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.project() {
            ResponseBodyProj::Full { data } => Poll::Ready(data.take().map(|d| Ok(Frame::data(d)))),
            ResponseBodyProj::File {
                file,
                buffer,
                remaining,
                path,
            } => {
                if *remaining == 0 {
                    return Poll::Ready(None);
                }

                let limit = buffer.len().min(usize::try_from(*remaining).unwrap_or(usize::MAX));
                let mut read_buf = ReadBuf::new(&mut buffer[..limit]);

                if let Err(err) = ready!(file.poll_read(cx, &mut read_buf)) {
                    tracing::error!(path = %path.display(), error = %err, "failed while streaming file");
                    *remaining = 0;
                    return Poll::Ready(Some(Err(err)));
                }

                let filled = read_buf.filled().len();
                if filled == 0 {
                    tracing::error!(
                        path = %path.display(),
                        missing = *remaining,
                        "file ended before its announced length"
                    );
                    *remaining = 0;
                    return Poll::Ready(Some(Err(io::Error::from(io::ErrorKind::UnexpectedEof))));
                }

                *remaining -= filled as u64;
                let data = Bytes::copy_from_slice(&buffer[..filled]);
                Poll::Ready(Some(Ok(Frame::data(data))))
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            ResponseBody::Full { data } => data.is_none(),
            ResponseBody::File { remaining, .. } => *remaining == 0,
        }
    }

    fn size_hint(&self) -> SizeHint {
        match self {
            ResponseBody::Full { data } => {
                SizeHint::with_exact(data.as_ref().map_or(0, |d| d.len() as u64))
            }
            ResponseBody::File { remaining, .. } => SizeHint::with_exact(*remaining),
        }
    }
}
