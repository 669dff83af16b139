// Root manifest (PACKAGE.SLIST) decoding

use crate::common::error::{Error, Result};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Standard alphabet, padding optional, trailing bits ignored on decode
///
/// Manifests are padded inconsistently, so trailing `=` is stripped before
/// decoding and the engine accepts the payload either way. Non-zero bits
/// in the last symbol are dropped the way lenient decoders do.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// One package entry of the manifest payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    pub id: String,
    /// Package config path, relative to the map root
    pub path: String,
    pub sha256: String,
}

/// Outer JSON object of PACKAGE.SLIST
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEnvelope {
    pub payload: String,
}

/// Decoded payload of the envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestPayload {
    pub packages: Vec<PackageDescriptor>,
}

fn parse_error<E>(reason: &'static str) -> impl FnOnce(E) -> Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    move |e| Error::ManifestParse { reason, source: Box::new(e) }
}

/// Decode the base64 payload text into its raw bytes
pub fn decode_payload(payload: &str) -> Result<Vec<u8>> {
    let trimmed = payload.trim().trim_end_matches('=');
    PAYLOAD_ENGINE
        .decode(trimmed)
        .map_err(parse_error("payload is not valid base64"))
}

/// Parse the contents of a PACKAGE.SLIST file
///
/// # Arguments
/// * `data` - Raw bytes of the manifest file
///
/// # Returns
/// * `Ok(Vec<PackageDescriptor>)` - Packages in manifest order
/// * `Err(Error::ManifestParse)` - On malformed JSON, base64 or missing fields
pub fn parse_manifest(data: &[u8]) -> Result<Vec<PackageDescriptor>> {
    let envelope: ManifestEnvelope =
        serde_json::from_slice(data).map_err(parse_error("envelope is not a valid JSON object"))?;

    let payload_bytes = decode_payload(&envelope.payload)?;
    let payload_text =
        String::from_utf8(payload_bytes).map_err(parse_error("payload is not valid UTF-8"))?;

    let payload: ManifestPayload = serde_json::from_str(&payload_text)
        .map_err(parse_error("payload is not a valid package list"))?;

    debug!("Manifest payload lists {} packages", payload.packages.len());
    Ok(payload.packages)
}

/// Locate and decode the manifest of a map root
///
/// # Returns
/// * `Err(Error::ManifestMissing)` - If the manifest file does not exist
pub fn read_manifest(manifest_path: &Path) -> Result<Vec<PackageDescriptor>> {
    if !manifest_path.is_file() {
        return Err(Error::ManifestMissing(manifest_path.to_path_buf()));
    }

    let data = fs::read(manifest_path)?;
    let packages = parse_manifest(&data)?;
    info!("Read {} packages from {}", packages.len(), manifest_path.display());
    Ok(packages)
}

/// Build PACKAGE.SLIST contents for a package list
///
/// The payload is written without padding, the way shipped manifests do.
pub fn encode_manifest(packages: &[PackageDescriptor]) -> Result<Vec<u8>> {
    let payload = ManifestPayload { packages: packages.to_vec() };
    let payload_json = serde_json::to_vec(&payload)
        .map_err(|e| Error::Config(format!("Failed to encode manifest payload: {}", e)))?;

    let envelope = ManifestEnvelope {
        payload: base64::engine::general_purpose::STANDARD_NO_PAD.encode(payload_json),
    };
    serde_json::to_vec(&envelope)
        .map_err(|e| Error::Config(format!("Failed to encode manifest: {}", e)))
}
