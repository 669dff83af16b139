// Storage module - streaming file digests

pub mod verification;

pub use verification::{
    compute_digest, compute_file_digest, compute_file_digest_with, verify_file_digest,
    HashAlgorithm,
};
