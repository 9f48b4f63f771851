//! Folder-backed corpus

use crate::corpus::{ImageSource, is_image_name};
use crate::io::error::{MosaicError, Result};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Image source reading the files of one directory
///
/// Only the directory's own files are listed (no recursion); entries are
/// returned sorted so index identifiers are reproducible across runs.
pub struct FolderSource {
    dir: PathBuf,
}

impl FolderSource {
    /// Open a directory as an image source
    ///
    /// # Errors
    ///
    /// Returns [`MosaicError::UnsupportedCorpus`] if the path is not a
    /// directory
    pub fn open(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(MosaicError::UnsupportedCorpus {
                path: dir.to_path_buf(),
            });
        }
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }
}

impl ImageSource for FolderSource {
    fn image_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| MosaicError::FileSystem {
                path: self.dir.clone(),
                operation: "list directory",
                source: e.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_image_name(&name) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn image(&self, name: &str) -> Result<DynamicImage> {
        let path = self.dir.join(name);
        if !path.is_file() {
            return Err(MosaicError::ImageNotFound {
                name: name.to_string(),
            });
        }
        image::open(&path).map_err(|e| MosaicError::ImageLoad {
            name: name.to_string(),
            source: e,
        })
    }
}
