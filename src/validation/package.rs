// Package config validation

use crate::common::config::ValidatorConfig;
use crate::common::error::{Error, Result};
use crate::common::types::resolve_relative;
use crate::protocol::{PackageConfig, PackageDescriptor, Partition};
use crate::storage::{verify_file_digest, HashAlgorithm};
use crate::validation::content::ContentValidator;
use crate::validation::hash::{is_hex_digest, normalize_digest};
use crate::validation::progress::ProgressSink;
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// What a single package validation checked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackageStats {
    pub partitions: usize,
    pub content_files: usize,
}

/// Validates one manifest entry against its package config and data files
pub struct PackageValidator<'a> {
    config: &'a ValidatorConfig,
}

impl<'a> PackageValidator<'a> {
    pub fn new(config: &'a ValidatorConfig) -> Self {
        Self { config }
    }

    /// Validate a package and everything it references
    ///
    /// The first failing check aborts; the error is wrapped with the
    /// descriptor's id.
    ///
    /// # Arguments
    /// * `descriptor` - Manifest entry of the package
    /// * `progress` - Receives a notice per verified file
    pub fn validate(
        &self,
        descriptor: &PackageDescriptor,
        progress: &mut dyn ProgressSink,
    ) -> Result<PackageStats> {
        self.validate_inner(descriptor, progress)
            .map_err(|e| Error::Package { id: descriptor.id.clone(), source: Box::new(e) })
    }

    fn validate_inner(
        &self,
        descriptor: &PackageDescriptor,
        progress: &mut dyn ProgressSink,
    ) -> Result<PackageStats> {
        let root = self.config.root.as_path();
        let config_path = resolve_relative(root, root, &descriptor.path)?;
        progress.file_started(&descriptor.path);
        self.check_file(&config_path, "package config", &descriptor.path, &descriptor.sha256)?;
        progress.file_verified(&descriptor.path);

        let data = fs::read(&config_path)?;
        let package_config: PackageConfig = serde_json::from_slice(&data)
            .map_err(|source| Error::ConfigParse { path: descriptor.path.clone(), source })?;
        check_identity(descriptor, &package_config)?;

        let mut stats = PackageStats::default();
        for partition in package_config.partitions() {
            progress.file_started(&partition.path);
            self.validate_partition(partition)?;
            progress.file_verified(&partition.path);
            stats.partitions += 1;
        }

        // A file at the root has the root itself as its directory
        let package_dir = config_path.parent().unwrap_or(root);
        stats.content_files = ContentValidator::new(self.config).validate(package_dir, progress)?;

        debug!(
            "Package {} ok: {} partitions, {} content files",
            descriptor.id, stats.partitions, stats.content_files
        );
        Ok(stats)
    }

    /// Check a catalog layer partition file against its declared SHA-256
    pub fn validate_partition(&self, partition: &Partition) -> Result<()> {
        let path = resolve_relative(&self.config.root, &self.config.root, &partition.path)?;
        self.check_file(&path, "catalog layer partition file", &partition.path, &partition.sha256)
    }

    fn check_file(&self, path: &Path, kind: &'static str, declared: &str, sha256: &str) -> Result<()> {
        if !path.is_file() {
            return Err(Error::FileMissing { kind, path: declared.to_string() });
        }

        if !is_hex_digest(sha256, 32) {
            warn!("Declared SHA-256 of {} is not a valid digest: {}", declared, sha256);
        }

        let mismatch = verify_file_digest(path, HashAlgorithm::Sha256, sha256, self.config.block_size)?;
        if let Some(actual) = mismatch {
            return Err(Error::ChecksumMismatch {
                kind,
                algorithm: HashAlgorithm::Sha256,
                path: declared.to_string(),
                expected: normalize_digest(sha256),
                actual,
            });
        }

        debug!("{} ok: {}", kind, declared);
        Ok(())
    }
}

/// Cross-check identity fields of a manifest entry and its config
pub fn check_identity(descriptor: &PackageDescriptor, config: &PackageConfig) -> Result<()> {
    if descriptor.id != config.id {
        return Err(Error::IdentityMismatch {
            field: "id",
            manifest: descriptor.id.clone(),
            config: config.id.clone(),
        });
    }

    if descriptor.path != config.config_path {
        return Err(Error::IdentityMismatch {
            field: "path",
            manifest: descriptor.path.clone(),
            config: config.config_path.clone(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PackageData;
    use crate::storage::compute_digest;
    use crate::validation::progress::NullProgress;
    use serde_json::json;

    fn sha256(data: &[u8]) -> String {
        compute_digest(data, HashAlgorithm::Sha256)
    }

    fn write(dir: &Path, name: &str, data: &[u8]) {
        let path = dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, data).unwrap();
    }

    /// Writes a package config and returns its manifest entry
    fn write_package(dir: &Path, config: serde_json::Value) -> PackageDescriptor {
        let data = config.to_string().into_bytes();
        let path = config["config_path"].as_str().unwrap().to_string();
        write(dir, &path, &data);
        PackageDescriptor {
            id: config["id"].as_str().unwrap().to_string(),
            path,
            sha256: sha256(&data),
        }
    }

    #[test]
    fn test_valid_package_with_partitions() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "DATA/P1.DAT", b"partition one");
        write(dir.path(), "DATA/P2.DAT", b"partition two");
        let descriptor = write_package(
            dir.path(),
            json!({
                "id": "nav-eu",
                "config_path": "NAV/PACKAGE.CFG",
                "data": {"catalogs": [{"layers": [{"partitions": [
                    {"path": "DATA/P1.DAT", "sha256": sha256(b"partition one")},
                    {"path": "DATA/P2.DAT", "sha256": sha256(b"partition two").to_uppercase()}
                ]}]}]}
            }),
        );

        let config = ValidatorConfig::new(dir.path());
        let stats = PackageValidator::new(&config).validate(&descriptor, &mut NullProgress).unwrap();
        assert_eq!(stats, PackageStats { partitions: 2, content_files: 0 });
    }

    #[test]
    fn test_config_checksum_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut descriptor = write_package(
            dir.path(),
            json!({"id": "nav-eu", "config_path": "NAV/PACKAGE.CFG", "data": {}}),
        );
        let actual = descriptor.sha256.clone();
        descriptor.sha256 = "AB".repeat(32);

        let config = ValidatorConfig::new(dir.path());
        let err = PackageValidator::new(&config)
            .validate(&descriptor, &mut NullProgress)
            .unwrap_err();

        assert_eq!(err.package_id(), Some("nav-eu"));
        match err.root_cause() {
            Error::ChecksumMismatch { path, expected, actual: computed, .. } => {
                assert_eq!(path, "NAV/PACKAGE.CFG");
                assert_eq!(expected, &"ab".repeat(32));
                assert_eq!(computed, &actual);
            }
            other => panic!("Expected ChecksumMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let descriptor = PackageDescriptor {
            id: "nav-eu".to_string(),
            path: "NAV/PACKAGE.CFG".to_string(),
            sha256: "00".repeat(32),
        };

        let config = ValidatorConfig::new(dir.path());
        let err = PackageValidator::new(&config)
            .validate(&descriptor, &mut NullProgress)
            .unwrap_err();
        assert!(matches!(err.root_cause(), Error::FileMissing { path, .. } if path == "NAV/PACKAGE.CFG"));
    }

    #[test]
    fn test_unparseable_config() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "NAV/PACKAGE.CFG", b"{\"id\": ");
        let descriptor = PackageDescriptor {
            id: "nav-eu".to_string(),
            path: "NAV/PACKAGE.CFG".to_string(),
            sha256: sha256(b"{\"id\": "),
        };

        let config = ValidatorConfig::new(dir.path());
        let err = PackageValidator::new(&config)
            .validate(&descriptor, &mut NullProgress)
            .unwrap_err();
        assert!(matches!(err.root_cause(), Error::ConfigParse { .. }));
    }

    #[test]
    fn test_check_identity() {
        let descriptor = PackageDescriptor {
            id: "nav-eu".to_string(),
            path: "NAV/PACKAGE.CFG".to_string(),
            sha256: String::new(),
        };
        let mut config = PackageConfig {
            id: "nav-eu".to_string(),
            config_path: "NAV/PACKAGE.CFG".to_string(),
            data: PackageData::default(),
        };
        assert!(check_identity(&descriptor, &config).is_ok());

        config.id = "nav-us".to_string();
        match check_identity(&descriptor, &config) {
            Err(Error::IdentityMismatch { field, manifest, config }) => {
                assert_eq!(field, "id");
                assert_eq!(manifest, "nav-eu");
                assert_eq!(config, "nav-us");
            }
            other => panic!("Expected IdentityMismatch, got {:?}", other),
        }

        config.id = "nav-eu".to_string();
        config.config_path = "NAV/OTHER.CFG".to_string();
        assert!(matches!(
            check_identity(&descriptor, &config),
            Err(Error::IdentityMismatch { field: "path", .. })
        ));
    }

    #[test]
    fn test_escaping_partition_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = ValidatorConfig::new(dir.path());
        let partition = Partition { path: "../outside.dat".to_string(), sha256: "00".repeat(32) };

        assert!(matches!(
            PackageValidator::new(&config).validate_partition(&partition),
            Err(Error::InvalidPath(_))
        ));
    }
}
