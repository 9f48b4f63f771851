//! Store file codec
//!
//! All persisted store files share one encoding: bincode with fixed-width
//! integers and big-endian byte order, so every integer is a fixed-size
//! field and every float an 8-byte IEEE-754 value, identical between
//! writer and reader. Writes go to a sibling temp file that is renamed
//! into place, so a crashed build never leaves a torn store behind.

use crate::io::error::{MosaicError, Result};
use bincode::Options;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_big_endian()
}

/// Atomically serialize a store file to disk
pub(crate) fn write_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut temp = path.as_os_str().to_os_string();
    temp.push(".tmp");
    let temp = Path::new(&temp);

    let file = File::create(temp).map_err(|e| MosaicError::FileSystem {
        path: temp.to_path_buf(),
        operation: "create store file",
        source: e,
    })?;
    options()
        .serialize_into(BufWriter::new(file), value)
        .map_err(|e| MosaicError::StoreEncoding {
            path: path.to_path_buf(),
            source: e,
        })?;

    std::fs::rename(temp, path).map_err(|e| MosaicError::FileSystem {
        path: path.to_path_buf(),
        operation: "commit store file",
        source: e,
    })
}

/// Deserialize a store file from disk
pub(crate) fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| MosaicError::FileSystem {
        path: path.to_path_buf(),
        operation: "open store file",
        source: e,
    })?;
    options()
        .deserialize_from(BufReader::new(file))
        .map_err(|e| MosaicError::StoreEncoding {
            path: path.to_path_buf(),
            source: e,
        })
}
