//! Whole-file loading
//!
//! The file is sized first, then read into a buffer reserved for exactly
//! that many bytes. A short read is an error, not a partial result.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// Read the file at `path` into an owned buffer of its exact length
pub fn load_file(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(|source| Error::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;

    let read_err = |source: io::Error| Error::FileRead {
        path: path.to_path_buf(),
        source,
    };

    if file.metadata().map_err(read_err)?.is_dir() {
        return Err(read_err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "is a directory",
        )));
    }

    let expected = file.seek(SeekFrom::End(0)).map_err(read_err)?;
    file.rewind().map_err(read_err)?;

    let expected = usize::try_from(expected)
        .map_err(|_| read_err(io::Error::new(io::ErrorKind::OutOfMemory, "file too large")))?;

    let mut buf = Vec::new();
    buf.try_reserve_exact(expected)?;
    buf.resize(expected, 0);

    // a file that shrank since it was sized fails with UnexpectedEof
    file.read_exact(&mut buf).map_err(read_err)?;

    debug!(path = %path.display(), bytes = expected, "loaded file");
    Ok(buf)
}
