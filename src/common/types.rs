// Common type definitions and constants

use std::path::{Component, Path, PathBuf};
use crate::common::error::{Error, Result};

/// Name of the root manifest file
pub const MANIFEST_FILE_NAME: &str = "PACKAGE.SLIST";
/// Name of the optional content descriptor next to a package config
pub const CONTENT_FILE_NAME: &str = "CONTENT.CFG";

// Constants
pub const HASH_BLOCK_SIZE: usize = 4096; // 4KB
pub const MIN_BLOCK_SIZE: usize = 512;
pub const MAX_BLOCK_SIZE: usize = 16 * 1024 * 1024; // 16MB

/// Join a declared relative path onto its base directory
///
/// `..` components are folded lexically and may climb out of `base`, but
/// never above `root`. Absolute paths are rejected. `base` must already
/// lie inside `root`.
pub fn resolve_relative(root: &Path, base: &Path, declared: &str) -> Result<PathBuf> {
    if declared.is_empty() {
        return Err(Error::InvalidPath(declared.to_string()));
    }

    let mut resolved = base.to_path_buf();
    for component in Path::new(declared).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if resolved.as_path() == root || !resolved.pop() {
                    return Err(Error::InvalidPath(declared.to_string()));
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(Error::InvalidPath(declared.to_string()));
            }
        }
    }

    if !resolved.starts_with(root) {
        return Err(Error::InvalidPath(declared.to_string()));
    }
    Ok(resolved)
}
