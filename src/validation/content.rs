// Content descriptor validation

use crate::common::config::ValidatorConfig;
use crate::common::error::{Error, Result};
use crate::common::types::resolve_relative;
use crate::protocol::content::{is_activated, ContentDescriptor, FileRef};
use crate::storage::{verify_file_digest, HashAlgorithm};
use crate::validation::hash::{is_hex_digest, normalize_digest};
use crate::validation::progress::ProgressSink;
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// Validates the optional CONTENT.CFG next to a package config
pub struct ContentValidator<'a> {
    config: &'a ValidatorConfig,
}

impl<'a> ContentValidator<'a> {
    pub fn new(config: &'a ValidatorConfig) -> Self {
        Self { config }
    }

    /// Validate the content descriptor of one package directory
    ///
    /// # Arguments
    /// * `package_dir` - Directory holding the package config
    /// * `progress` - Receives a notice per verified file
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of content files verified (0 when there is
    ///   no descriptor or it is not activated)
    /// * `Err(Error)` - First missing, resized or corrupted file
    pub fn validate(&self, package_dir: &Path, progress: &mut dyn ProgressSink) -> Result<usize> {
        let content_path = package_dir.join(&self.config.content_name);
        if !content_path.is_file() {
            debug!("No {} in {}", self.config.content_name, package_dir.display());
            return Ok(0);
        }

        let display_path = content_path.display().to_string();
        let data = fs::read(&content_path)?;
        let document: serde_json::Value = serde_json::from_slice(&data)
            .map_err(|source| Error::ConfigParse { path: display_path.clone(), source })?;

        if !is_activated(&document) {
            warn!("Skipping {}: no base_global_files entry", display_path);
            return Ok(0);
        }

        let descriptor: ContentDescriptor = serde_json::from_value(document)
            .map_err(|source| Error::ConfigParse { path: display_path, source })?;

        let mut verified = 0;
        for file in descriptor.files() {
            progress.file_started(&file.path);
            self.validate_file(package_dir, file)?;
            progress.file_verified(&file.path);
            verified += 1;
        }

        Ok(verified)
    }

    /// Check presence, size and (when declared) MD5 of one file
    pub fn validate_file(&self, package_dir: &Path, file: &FileRef) -> Result<()> {
        let path = resolve_relative(&self.config.root, package_dir, &file.path)?;
        if !path.is_file() {
            return Err(Error::FileMissing { kind: "file", path: file.path.clone() });
        }

        let actual_size = fs::metadata(&path)?.len();
        if actual_size != file.size {
            return Err(Error::SizeMismatch {
                path: file.path.clone(),
                expected: file.size,
                actual: actual_size,
            });
        }

        if let Some(md5) = &file.md5 {
            if !is_hex_digest(md5, 16) {
                warn!("Declared MD5 of {} is not a valid digest: {}", file.path, md5);
            }
            let mismatch =
                verify_file_digest(&path, HashAlgorithm::Md5, md5, self.config.block_size)?;
            if let Some(actual) = mismatch {
                return Err(Error::ChecksumMismatch {
                    kind: "file",
                    algorithm: HashAlgorithm::Md5,
                    path: file.path.clone(),
                    expected: normalize_digest(md5),
                    actual,
                });
            }
        }

        debug!("Content file ok: {}", file.path);
        Ok(())
    }
}
