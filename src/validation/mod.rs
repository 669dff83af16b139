// Validation module

pub mod content;
pub mod hash;
pub mod package;
pub mod progress;

pub use content::ContentValidator;
pub use hash::{digests_match, is_hex_digest, normalize_digest};
pub use package::{check_identity, PackageStats, PackageValidator};
pub use progress::{LogProgress, NullProgress, ProgressSink};
