use compression_codecs::{
    EncodeV2,
    brotli::{BrotliEncoder, params::EncoderParams as BrotliParams},
    gzip::GzipEncoder,
    zlib::ZlibEncoder,
};
use compression_core::Level;
use compression_core::util::{PartialBuffer, WriteBuffer};
use std::fmt;
use std::io;

const OUTPUT_BUFFER_SIZE: usize = 8 * 1024; // 8KB output buffer

/// Supported content encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    /// Brotli compression.
    Brotli,
    /// Gzip compression.
    Gzip,
    /// Deflate (zlib-wrapped) compression.
    Deflate,
}

impl Codec {
    /// Every supported codec, in default priority order.
    pub const ALL: [Codec; 3] = [Codec::Brotli, Codec::Gzip, Codec::Deflate];

    /// Returns the Content-Encoding header value for this codec.
    pub fn content_encoding(&self) -> &'static str {
        match self {
            Codec::Brotli => "br",
            Codec::Gzip => "gzip",
            Codec::Deflate => "deflate",
        }
    }

    /// Maps a literal Accept-Encoding token to a codec.
    ///
    /// Matching is exact: aliases such as `x-gzip` and parameterised tokens
    /// such as `gzip;q=0.5` are not recognised.
    pub fn from_token(token: &str) -> Option<Codec> {
        Codec::ALL
            .into_iter()
            .find(|codec| codec.content_encoding() == token)
    }

    /// Returns the file name suffix of the pre-encoded variant.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Codec::Brotli => "br",
            Codec::Gzip => "gz",
            Codec::Deflate => "zz",
        }
    }

    /// Creates a new encoder for this codec.
    pub fn encoder(&self) -> Box<dyn EncodeV2 + Send> {
        match self {
            Codec::Brotli => Box::new(BrotliEncoder::new(BrotliParams::default())),
            Codec::Gzip => Box::new(GzipEncoder::new(Level::Default.into())),
            // HTTP `deflate` is the zlib-wrapped stream, not raw DEFLATE.
            Codec::Deflate => Box::new(ZlibEncoder::new(Level::Default.into())),
        }
    }

    /// Encodes a complete buffer, returning the finished stream.
    pub fn encode(&self, input: &[u8]) -> io::Result<Vec<u8>> {
        let mut encoder = self.encoder();
        let mut scratch = vec![0u8; OUTPUT_BUFFER_SIZE];
        let mut encoded = Vec::with_capacity(input.len() / 2);
        let mut input_buf = PartialBuffer::new(input);

        while input_buf.written_len() < input.len() {
            let mut output = WriteBuffer::new_initialized(scratch.as_mut_slice());
            let consumed = input_buf.written_len();

            encoder
                .encode(&mut input_buf, &mut output)
                .map_err(io::Error::other)?;

            let written = output.written_len();
            encoded.extend_from_slice(&scratch[..written]);

            if written == 0 && input_buf.written_len() == consumed {
                return Err(io::Error::other(format!(
                    "{self} encoder made no progress"
                )));
            }
        }

        loop {
            let mut output = WriteBuffer::new_initialized(scratch.as_mut_slice());
            let done = encoder.finish(&mut output).map_err(io::Error::other)?;

            let written = output.written_len();
            encoded.extend_from_slice(&scratch[..written]);

            if done {
                break;
            }
        }

        Ok(encoded)
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.content_encoding())
    }
}
