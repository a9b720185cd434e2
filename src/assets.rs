use crate::codec::Codec;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Fixed mapping from a negotiated encoding to the file that holds it.
///
/// Variants sit next to the source with the codec suffix appended,
/// e.g. `test.html.br`, `test.html.gz`, `test.html.zz`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    source: PathBuf,
    brotli: PathBuf,
    gzip: PathBuf,
    deflate: PathBuf,
}

impl AssetPaths {
    /// Derives the variant paths from the source path.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        let source = source.into();
        Self {
            brotli: variant_path(&source, Codec::Brotli),
            gzip: variant_path(&source, Codec::Gzip),
            deflate: variant_path(&source, Codec::Deflate),
            source,
        }
    }

    /// The uncompressed source asset.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The file to serve for a negotiated encoding; `None` is the source itself.
    pub fn resolve(&self, codec: Option<Codec>) -> &Path {
        match codec {
            None => &self.source,
            Some(Codec::Brotli) => &self.brotli,
            Some(Codec::Gzip) => &self.gzip,
            Some(Codec::Deflate) => &self.deflate,
        }
    }

    /// Every encoded variant with its path.
    pub fn variants(&self) -> impl Iterator<Item = (Codec, &Path)> {
        Codec::ALL
            .into_iter()
            .map(move |codec| (codec, self.resolve(Some(codec))))
    }
}

fn variant_path(source: &Path, codec: Codec) -> PathBuf {
    let mut name = OsString::from(source.as_os_str());
    name.push(".");
    name.push(codec.file_suffix());
    PathBuf::from(name)
}
