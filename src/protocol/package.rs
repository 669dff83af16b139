// Package config structures

use serde::{Deserialize, Deserializer, Serialize};

/// Config file referenced by a manifest entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageConfig {
    pub id: String,
    /// Must equal the manifest path this config was loaded from
    pub config_path: String,
    pub data: PackageData,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageData {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub catalogs: Option<Vec<Catalog>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub layers: Vec<Layer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub partitions: Vec<Partition>,
}

/// Map data file, path relative to the map root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub path: String,
    pub sha256: String,
}

/// Optional field that may be left out but must not be `null`
///
/// Serde only calls this when the key is present; a missing key falls back
/// to `default`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl PackageConfig {
    /// Partitions in catalog, layer, partition order
    pub fn partitions(&self) -> impl Iterator<Item = &Partition> {
        self.data
            .catalogs
            .iter()
            .flatten()
            .flat_map(|catalog| catalog.layers.iter())
            .flat_map(|layer| layer.partitions.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_without_catalogs() {
        let config: PackageConfig = serde_json::from_str(
            r#"{"id": "nav", "config_path": "NAV/PACKAGE.CFG", "data": {"version": 3}}"#,
        )
        .unwrap();

        assert!(config.data.catalogs.is_none());
        assert_eq!(config.partitions().count(), 0);
    }

    #[test]
    fn test_partition_order() {
        let config: PackageConfig = serde_json::from_value(serde_json::json!({
            "id": "nav",
            "config_path": "NAV/PACKAGE.CFG",
            "data": {"catalogs": [
                {"layers": [
                    {"partitions": [{"path": "a", "sha256": "1"}, {"path": "b", "sha256": "2"}]},
                    {"partitions": []}
                ]},
                {"layers": [{"partitions": [{"path": "c", "sha256": "3"}]}]}
            ]}
        }))
        .unwrap();

        let paths: Vec<&str> = config.partitions().map(|p| p.path.as_str()).collect();
        assert_eq!(paths, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_null_catalogs_rejected() {
        let result = serde_json::from_str::<PackageConfig>(
            r#"{"id": "nav", "config_path": "NAV/PACKAGE.CFG", "data": {"catalogs": null}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_required_fields() {
        assert!(serde_json::from_str::<PackageConfig>(r#"{"id": "nav", "data": {}}"#).is_err());
        assert!(serde_json::from_str::<PackageConfig>(
            r#"{"id": "nav", "config_path": "x", "data": {"catalogs": [{}]}}"#
        )
        .is_err());
    }
}
