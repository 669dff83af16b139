// Protocol module - on-disk descriptor formats

pub mod content;
pub mod manifest;
pub mod package;

pub use content::{Block, ContentDescriptor, FileRef, Product, Region};
pub use manifest::{encode_manifest, parse_manifest, read_manifest, PackageDescriptor};
pub use package::{Catalog, Layer, PackageConfig, PackageData, Partition};
