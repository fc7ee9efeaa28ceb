use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Result, SignerError};

const READ_CHUNK: usize = 8 * 1024;

/// Opens a payload for streaming.
pub fn open_source(path: impl AsRef<Path>) -> Result<File> {
    let path = path.as_ref();
    File::open(path).map_err(|e| SignerError::source_unreadable(path, e))
}

/// Reads a payload into memory.
pub fn read_source(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).map_err(|e| SignerError::source_unreadable(path, e))
}

/// Reads `source` to its end, handing each chunk to `ingest`.
///
/// Read failures are reported against `path`; errors from `ingest` pass
/// through unchanged. Returns the number of bytes read.
pub fn stream_source<R, F>(mut source: R, path: &Path, mut ingest: F) -> Result<u64>
where
    R: Read,
    F: FnMut(&[u8]) -> Result<()>,
{
    let mut buf = [0u8; READ_CHUNK];
    let mut total = 0u64;
    loop {
        let n = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(SignerError::source_unreadable(path, e)),
        };
        ingest(&buf[..n])?;
        total += n as u64;
    }
    Ok(total)
}

/// Writes `bytes` to `path` atomically.
///
/// The bytes go to a temporary file beside `path` which is then renamed
/// over it, so `path` is either untouched or fully written. The temporary
/// file is removed if anything fails. An existing destination keeps its
/// permissions; a new one gets the umask default, as a plain create would.
pub fn write_sink(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp =
        sink_temp_file(dir, path).map_err(|e| SignerError::sink_unwritable(path, e))?;
    tmp.write_all(bytes)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| SignerError::sink_unwritable(path, e))?;
    tmp.persist(path).map_err(|e| SignerError::sink_unwritable(path, e.error))?;

    tracing::debug!(path = %path.display(), len = bytes.len(), "wrote output");
    Ok(())
}

fn sink_temp_file(dir: &Path, dest: &Path) -> std::io::Result<NamedTempFile> {
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let tmp = builder.tempfile_in(dir)?;

    if let Some(meta) = fs::metadata(dest).ok().filter(|m| m.is_file()) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    Ok(tmp)
}
