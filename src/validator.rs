// Validation run over a whole map root

use crate::common::config::ValidatorConfig;
use crate::common::error::{Error, Result};
use crate::protocol::{read_manifest, PackageDescriptor};
use crate::validation::package::PackageValidator;
use crate::validation::progress::{LogProgress, ProgressSink};
use log::info;
use std::path::Path;

/// Totals of a successful validation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub packages: usize,
    pub partitions: usize,
    pub content_files: usize,
}

/// Validates a map update tree: manifest first, then each package in order
///
/// Validation is fail-fast; the first failing package stops the run.
pub struct MapValidator {
    config: ValidatorConfig,
}

impl MapValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Decode the manifest of the configured root
    ///
    /// # Returns
    /// * `Err(Error::Manifest)` - Wrapping `ManifestMissing` or `ManifestParse`
    pub fn packages(&self) -> Result<Vec<PackageDescriptor>> {
        read_manifest(&self.config.manifest_path()).map_err(|e| Error::Manifest {
            name: self.config.manifest_name.clone(),
            source: Box::new(e),
        })
    }

    /// Run the full validation
    ///
    /// # Arguments
    /// * `progress` - Receives one `package_started` notice per package,
    ///   in manifest order
    ///
    /// # Returns
    /// * `Ok(ValidationReport)` - Every package and referenced file is valid
    /// * `Err(Error)` - The first failure, wrapped with its context
    pub fn validate(&self, progress: &mut dyn ProgressSink) -> Result<ValidationReport> {
        info!("Validating map root {}", self.config.root.display());

        let packages = self.packages()?;
        progress.manifest_loaded(packages.len());

        let package_validator = PackageValidator::new(&self.config);
        let mut report = ValidationReport::default();

        for (index, descriptor) in packages.iter().enumerate() {
            progress.package_started(index, packages.len(), descriptor);
            let stats = package_validator.validate(descriptor, progress)?;

            report.packages += 1;
            report.partitions += stats.partitions;
            report.content_files += stats.content_files;
        }

        progress.finished(&report);
        info!("Map root {} is valid", self.config.root.display());
        Ok(report)
    }
}

/// Validate the map tree at `root` with default settings, logging progress
pub fn run_validation(root: impl AsRef<Path>) -> Result<ValidationReport> {
    MapValidator::new(ValidatorConfig::new(root)).validate(&mut LogProgress)
}
