// Configuration types

use std::path::{Path, PathBuf};
use crate::common::error::{Error, Result};
use crate::common::types::{
    CONTENT_FILE_NAME, HASH_BLOCK_SIZE, MANIFEST_FILE_NAME, MAX_BLOCK_SIZE, MIN_BLOCK_SIZE,
};

#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Map root: USB stick root or extracted archive root
    pub root: PathBuf,
    /// Read size used when streaming files through a digest
    pub block_size: usize,
    pub manifest_name: String,
    pub content_name: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            block_size: HASH_BLOCK_SIZE,
            manifest_name: MANIFEST_FILE_NAME.to_string(),
            content_name: CONTENT_FILE_NAME.to_string(),
        }
    }
}

impl ValidatorConfig {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    pub fn with_block_size(mut self, size: usize) -> Result<Self> {
        if size < MIN_BLOCK_SIZE || size > MAX_BLOCK_SIZE {
            return Err(Error::Config(format!(
                "Block size must be between {} and {}",
                MIN_BLOCK_SIZE, MAX_BLOCK_SIZE
            )));
        }
        self.block_size = size;
        Ok(self)
    }

    pub fn with_manifest_name(mut self, name: impl Into<String>) -> Self {
        self.manifest_name = name.into();
        self
    }

    pub fn with_content_name(mut self, name: impl Into<String>) -> Self {
        self.content_name = name.into();
        self
    }

    /// Full path of the root manifest
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.manifest_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ValidatorConfig::new("/mnt/usb");
        assert_eq!(config.block_size, 4096);
        assert_eq!(config.manifest_path(), PathBuf::from("/mnt/usb/PACKAGE.SLIST"));
        assert_eq!(config.content_name, "CONTENT.CFG");
    }

    #[test]
    fn test_block_size_bounds() {
        assert!(ValidatorConfig::default().with_block_size(1).is_err());
        assert!(ValidatorConfig::default().with_block_size(MAX_BLOCK_SIZE + 1).is_err());

        let config = ValidatorConfig::default().with_block_size(65536).unwrap();
        assert_eq!(config.block_size, 65536);
    }
}
