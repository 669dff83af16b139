// Content descriptor (CONTENT.CFG) structures

use crate::protocol::package::present;
use serde::{Deserialize, Serialize};

/// Key whose presence enables content validation
pub const ACTIVATION_KEY: &str = "base_global_files";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDescriptor {
    pub regions: Vec<Region>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<Block>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub file: FileRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub files: Vec<FileRef>,
}

/// File path relative to the package directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub path: String,
    pub size: u64,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
}

/// Whether a parsed CONTENT.CFG asks for validation at all
///
/// Only the key's presence counts, not its value.
pub fn is_activated(document: &serde_json::Value) -> bool {
    document
        .as_object()
        .map_or(false, |object| object.contains_key(ACTIVATION_KEY))
}

impl ContentDescriptor {
    /// Files in region order: product file first, then block files
    pub fn files(&self) -> impl Iterator<Item = &FileRef> {
        self.regions.iter().flat_map(|region| {
            region
                .product
                .iter()
                .map(|product| &product.file)
                .chain(region.blocks.iter().flatten().flat_map(|block| block.files.iter()))
        })
    }
}
