// Progress reporting for a validation run

use crate::protocol::PackageDescriptor;
use crate::validator::ValidationReport;
use log::{debug, info};

/// Receives progress notices from the validators
///
/// Notices arrive strictly in validation order.
pub trait ProgressSink {
    /// The manifest was decoded and lists `count` packages
    fn manifest_loaded(&mut self, _count: usize) {}

    /// Validation of a package is about to start (`index` is zero-based)
    fn package_started(&mut self, index: usize, total: usize, descriptor: &PackageDescriptor);

    /// A referenced file is about to be checked
    fn file_started(&mut self, _path: &str) {}

    /// A referenced file passed its size/checksum checks
    fn file_verified(&mut self, _path: &str) {}

    /// Every package validated
    fn finished(&mut self, _report: &ValidationReport) {}
}

/// Reports progress through the `log` facade
#[derive(Debug, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn manifest_loaded(&mut self, count: usize) {
        info!("Manifest lists {} packages", count);
    }

    fn package_started(&mut self, index: usize, total: usize, descriptor: &PackageDescriptor) {
        info!("Validating package {}/{}: {}", index + 1, total, descriptor.id);
    }

    fn file_started(&mut self, path: &str) {
        debug!("Verifying {}", path);
    }

    fn file_verified(&mut self, path: &str) {
        debug!("Verified {}", path);
    }

    fn finished(&mut self, report: &ValidationReport) {
        info!(
            "Validated {} packages, {} partitions, {} content files",
            report.packages, report.partitions, report.content_files
        );
    }
}

/// Discards all progress notices
#[derive(Debug, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn package_started(&mut self, _index: usize, _total: usize, _descriptor: &PackageDescriptor) {}
}
