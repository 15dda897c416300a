//! Static asset copying.
//!
//! The stylesheet, the browser script, the image directory and the CMS admin
//! directory are shipped as is. Files are copied to the same relative path
//! under the output root; directories are copied recursively, file for file.
//! An existing file at the destination is overwritten in full. Files already
//! in the output that have no source counterpart are left in place.
//!
//! A declared asset that does not exist in the source tree is skipped.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("cannot copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// What was copied, relative to the source root.
#[derive(Debug, Clone, Default)]
pub struct CopiedAssets {
    pub files: Vec<PathBuf>,
    /// Each copied directory with the number of files it contained.
    pub dirs: Vec<(PathBuf, usize)>,
}

/// Copy the declared static files and directories from `source_root` to
/// `output_root`.
pub fn copy_static(
    source_root: &Path,
    output_root: &Path,
    files: &[String],
    dirs: &[String],
) -> Result<CopiedAssets, AssetError> {
    let mut copied = CopiedAssets::default();

    for file in files {
        let from = source_root.join(file);
        if !from.is_file() {
            tracing::debug!("Static file not found, skipping: {}", from.display());
            continue;
        }
        let to = output_root.join(file);
        if let Some(parent) = to.parent() {
            create_dir(parent)?;
        }
        copy_file(&from, &to)?;
        copied.files.push(PathBuf::from(file));
    }

    for dir in dirs {
        let from = source_root.join(dir);
        if !from.is_dir() {
            tracing::debug!("Static directory not found, skipping: {}", from.display());
            continue;
        }
        let count = copy_dir_recursive(&from, &output_root.join(dir))?;
        copied.dirs.push((PathBuf::from(dir), count));
    }

    Ok(copied)
}

/// Copy a single file, replacing any existing file at `to`.
pub fn copy_file(from: &Path, to: &Path) -> Result<(), AssetError> {
    fs::copy(from, to).map_err(|source| AssetError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Recursively copy `src` into `dst`, creating directories as needed.
///
/// Entries are visited in file-name order. Returns the number of files
/// copied.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<usize, AssetError> {
    create_dir(dst)?;

    let mut count = 0;
    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| AssetError::Walk {
            path: src.to_path_buf(),
            source,
        })?;
        // `min_depth(1)` guarantees every entry sits under `src`.
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            create_dir(&target)?;
        } else {
            copy_file(entry.path(), &target)?;
            count += 1;
        }
    }
    Ok(count)
}

fn create_dir(path: &Path) -> Result<(), AssetError> {
    fs::create_dir_all(path).map_err(|source| AssetError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}
