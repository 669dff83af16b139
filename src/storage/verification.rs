// File digest computation

use crate::common::error::Result;
use crate::common::types::HASH_BLOCK_SIZE;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Digest algorithms used by map update descriptors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
    Md5,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Sha256 => write!(f, "SHA-256"),
            HashAlgorithm::Md5 => write!(f, "MD5"),
        }
    }
}

/// Incremental hasher over one of the supported algorithms
enum StreamHasher {
    Sha256(Sha256),
    Md5(md5::Context),
}

impl StreamHasher {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Sha256 => StreamHasher::Sha256(Sha256::new()),
            HashAlgorithm::Md5 => StreamHasher::Md5(md5::Context::new()),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            StreamHasher::Sha256(hasher) => hasher.update(data),
            StreamHasher::Md5(context) => context.consume(data),
        }
    }

    fn finalize_hex(self) -> String {
        match self {
            StreamHasher::Sha256(hasher) => hex::encode(hasher.finalize()),
            StreamHasher::Md5(context) => format!("{:x}", context.compute()),
        }
    }
}

/// Compute the lowercase hex digest of a file
///
/// The file is streamed in 4 KB blocks so memory use does not depend on
/// its size. The handle is dropped before returning.
///
/// # Arguments
/// * `file_path` - Path to the file to hash
/// * `algorithm` - Digest algorithm
///
/// # Returns
/// * `Ok(String)` - The digest as lowercase hex
/// * `Err(Error)` - If the file can't be opened or read
pub fn compute_file_digest(file_path: &Path, algorithm: HashAlgorithm) -> Result<String> {
    compute_file_digest_with(file_path, algorithm, HASH_BLOCK_SIZE)
}

/// Same as [`compute_file_digest`] with an explicit read block size
pub fn compute_file_digest_with(
    file_path: &Path,
    algorithm: HashAlgorithm,
    block_size: usize,
) -> Result<String> {
    let mut file = File::open(file_path)?;
    let mut hasher = StreamHasher::new(algorithm);
    let mut buffer = vec![0u8; block_size.max(1)];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize_hex())
}

/// Compute the lowercase hex digest of an in-memory buffer
pub fn compute_digest(data: &[u8], algorithm: HashAlgorithm) -> String {
    let mut hasher = StreamHasher::new(algorithm);
    hasher.update(data);
    hasher.finalize_hex()
}

/// Check a file against a declared hex digest
///
/// # Returns
/// * `Ok(None)` - If the digest matches (case-insensitive)
/// * `Ok(Some(actual))` - The computed digest, when it does not match
/// * `Err(Error)` - If the file can't be read
pub fn verify_file_digest(
    file_path: &Path,
    algorithm: HashAlgorithm,
    expected: &str,
    block_size: usize,
) -> Result<Option<String>> {
    let actual = compute_file_digest_with(file_path, algorithm, block_size)?;
    if crate::validation::hash::digests_match(expected, &actual) {
        Ok(None)
    } else {
        Ok(Some(actual))
    }
}
