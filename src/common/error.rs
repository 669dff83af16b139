// Error types and error handling

use crate::storage::HashAlgorithm;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Boxed error used to carry decoder failures through the chain
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Config(String),
    /// Top-level context: the manifest could not be read
    Manifest { name: String, source: Box<Error> },
    /// Top-level context: a package failed validation
    Package { id: String, source: Box<Error> },
    ManifestMissing(PathBuf),
    ManifestParse { reason: &'static str, source: BoxError },
    ConfigParse { path: String, source: serde_json::Error },
    FileMissing { kind: &'static str, path: String },
    InvalidPath(String),
    ChecksumMismatch {
        kind: &'static str,
        algorithm: HashAlgorithm,
        path: String,
        expected: String,
        actual: String,
    },
    SizeMismatch { path: String, expected: u64, actual: u64 },
    IdentityMismatch { field: &'static str, manifest: String, config: String },
}

impl Error {
    /// Innermost error of the context chain built by the validators
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Manifest { source, .. } => source.root_cause(),
            Error::Package { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Id of the package this error was raised for, if any
    pub fn package_id(&self) -> Option<&str> {
        match self {
            Error::Package { id, .. } => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Manifest { name, .. } => write!(f, "Failed to parse {}", name),
            Error::Package { id, .. } => write!(f, "Failed to validate package {}", id),
            Error::ManifestMissing(path) => match (path.file_name(), path.parent()) {
                (Some(name), Some(folder)) => write!(
                    f,
                    "{} not found in root folder: {}",
                    name.to_string_lossy(),
                    folder.display()
                ),
                _ => write!(f, "Manifest not found: {}", path.display()),
            },
            Error::ManifestParse { reason, .. } => write!(f, "Malformed manifest: {}", reason),
            Error::ConfigParse { path, .. } => write!(f, "Failed to parse {}", path),
            Error::FileMissing { kind, path } => {
                write!(f, "Referenced {} not found: {}", kind, path)
            }
            Error::InvalidPath(path) => {
                write!(f, "Referenced path escapes its base directory: {}", path)
            }
            Error::ChecksumMismatch { kind, algorithm, path, expected, actual } => write!(
                f,
                "Checksum error in {} {}: should = {}, is = {} ({})",
                kind, path, expected, actual, algorithm
            ),
            Error::SizeMismatch { path, expected, actual } => write!(
                f,
                "File size mismatch for {}: should = {}, is = {}",
                path, expected, actual
            ),
            Error::IdentityMismatch { field, manifest, config } => write!(
                f,
                "Package {} does not match in slist/package config: {} != {}",
                field, manifest, config
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Manifest { source, .. } => Some(source.as_ref()),
            Error::Package { source, .. } => Some(source.as_ref()),
            Error::ManifestParse { source, .. } => Some(source.as_ref()),
            Error::ConfigParse { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn checksum_error() -> Error {
        Error::ChecksumMismatch {
            kind: "package config",
            algorithm: HashAlgorithm::Sha256,
            path: "pkg/PACKAGE.CFG".to_string(),
            expected: "aa".to_string(),
            actual: "bb".to_string(),
        }
    }

    #[test]
    fn test_root_cause_unwraps_context() {
        let err = Error::Package {
            id: "nav-eu".to_string(),
            source: Box::new(checksum_error()),
        };

        assert_eq!(err.package_id(), Some("nav-eu"));
        assert!(matches!(err.root_cause(), Error::ChecksumMismatch { .. }));
    }

    #[test]
    fn test_wrapper_display_does_not_repeat_source() {
        let err = Error::Package {
            id: "nav-eu".to_string(),
            source: Box::new(checksum_error()),
        };

        assert_eq!(err.to_string(), "Failed to validate package nav-eu");
        let source = err.source().unwrap().to_string();
        assert!(source.ends_with("(SHA-256)"));
        assert!(source.contains("should = aa"));
        assert!(source.contains("is = bb"));
    }

    #[test]
    fn test_manifest_wrapper_chain() {
        let err = Error::Manifest {
            name: "TEST.SLIST".to_string(),
            source: Box::new(Error::ManifestMissing(PathBuf::from("/mnt/usb/TEST.SLIST"))),
        };

        assert_eq!(err.to_string(), "Failed to parse TEST.SLIST");
        assert!(matches!(err.root_cause(), Error::ManifestMissing(_)));
        assert!(err.package_id().is_none());
        assert_eq!(
            err.source().unwrap().to_string(),
            "TEST.SLIST not found in root folder: /mnt/usb"
        );
    }
}
