// Integrity validation for MIB3 map update package trees

pub mod common;
pub mod protocol;
pub mod storage;
pub mod validation;
pub mod validator;

pub use crate::common::{Error, Result, ValidatorConfig};
pub use crate::protocol::PackageDescriptor;
pub use crate::storage::HashAlgorithm;
pub use crate::validation::{LogProgress, NullProgress, ProgressSink};
pub use crate::validator::{run_validation, MapValidator, ValidationReport};
