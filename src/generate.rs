//! One-shot creation of the pre-encoded variants.

use crate::assets::AssetPaths;
use crate::codec::Codec;
use crate::error::Error;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Outcome of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Size of the source asset in bytes.
    pub source_len: u64,
    /// Variants written, with their encoded size in bytes.
    pub written: Vec<(Codec, u64)>,
    /// Variants that failed to encode or write.
    pub failed: Vec<Codec>,
}

impl GenerationReport {
    /// Returns true if every variant was produced.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Reads the source once and writes every encoded variant, overwriting old ones.
///
/// Only an unreadable source is an error. A codec that fails is logged and
/// listed in [`GenerationReport::failed`]; the others still run.
pub fn generate(paths: &AssetPaths) -> Result<GenerationReport, Error> {
    let source = fs::read(paths.source()).map_err(|source| Error::SourceUnreadable {
        path: paths.source().to_path_buf(),
        source,
    })?;

    let mut report = GenerationReport {
        source_len: source.len() as u64,
        ..GenerationReport::default()
    };

    for (codec, path) in paths.variants() {
        match write_variant(codec, &source, path) {
            Ok(len) => {
                tracing::info!(
                    encoding = %codec,
                    path = %path.display(),
                    bytes = len,
                    source_bytes = report.source_len,
                    "wrote encoded variant"
                );
                report.written.push((codec, len));
            }
            Err(err) => {
                tracing::warn!(
                    encoding = %codec,
                    path = %path.display(),
                    error = %err,
                    "failed to generate encoded variant"
                );
                report.failed.push(codec);
            }
        }
    }

    Ok(report)
}

/// Writes next to the target and renames into place, so the variant path
/// only ever holds a complete encoding. On failure nothing is left behind.
fn write_variant(codec: Codec, source: &[u8], path: &Path) -> io::Result<u64> {
    let staging = staging_path(path);

    let result = codec.encode(source).and_then(|encoded| {
        fs::write(&staging, &encoded)?;
        fs::rename(&staging, path)?;
        Ok(encoded.len() as u64)
    });

    if result.is_err() {
        discard(&staging);
        discard(path);
    }

    result
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

fn discard(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to remove leftover file");
        }
    }
}
