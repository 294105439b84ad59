use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{
    MetadataConnection, MetadataError, MetadataStore, PartitionAttribute, SnapshotConnection,
    TableMapping,
};

/// On-disk layout:
///
/// ```yaml
/// tables:
///   - { origin: lineitem, id: 1, target: lineitem_part }
/// partitions:
///   - { table_id: 1, origin: l_orderkey, target: l_orderkey_part, floor: 20000 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataDocument {
    #[serde(default)]
    pub tables: Vec<TableRow>,
    #[serde(default)]
    pub partitions: Vec<PartitionRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub origin: String,
    pub id: i64,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionRow {
    pub table_id: i64,
    pub origin: String,
    pub target: String,
    pub floor: i64,
}

/// Metadata kept in a YAML file. The file is re-read on every `connect`, so
/// edits are picked up by the next rewrite.
#[derive(Debug, Clone)]
pub struct YamlMetadataStore {
    path: PathBuf,
}

impl YamlMetadataStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        YamlMetadataStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self) -> Result<MetadataDocument, MetadataError> {
        let path = self.path.display().to_string();
        let content = std::fs::read_to_string(&self.path).map_err(|source| MetadataError::Io {
            path: path.clone(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(MetadataDocument::default());
        }
        serde_yaml::from_str(&content).map_err(|source| MetadataError::Yaml { path, source })
    }
}

impl MetadataStore for YamlMetadataStore {
    fn connect(&self) -> Result<Box<dyn MetadataConnection + '_>, MetadataError> {
        let document = self.load()?;

        let mappings = document
            .tables
            .into_iter()
            .map(|row| TableMapping {
                origin_table: row.origin,
                internal_id: row.id,
                target_table: row.target,
            })
            .collect();
        let attributes = document
            .partitions
            .into_iter()
            .map(|row| PartitionAttribute {
                internal_id: row.table_id,
                origin_column: row.origin,
                target_column: row.target,
                floor_parameter: row.floor,
            })
            .collect();

        Ok(Box::new(SnapshotConnection::new("yaml", mappings, attributes)))
    }
}
