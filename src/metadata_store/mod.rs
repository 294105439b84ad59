//! Read-only access to the table-mapping and partition-attribute records
//! that drive partition rewriting.
//!
//! Every rewrite call acquires its own [`MetadataConnection`] through
//! [`MetadataStore::connect`] and drops it before returning, so nothing read
//! from the store outlives a call.

use serde::{Deserialize, Serialize};

mod clickhouse_store;
mod errors;
mod in_memory;
mod yaml_store;

pub use clickhouse_store::ClickHouseMetadataStore;
pub use errors::MetadataError;
pub use in_memory::{InMemoryMetadataStore, SnapshotConnection};
pub use yaml_store::{MetadataDocument, PartitionRow, TableRow, YamlMetadataStore};

use crate::config::{AppConfig, MetadataBackend};

/// A logical table that is physically stored as `target_table`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMapping {
    pub origin_table: String,
    pub internal_id: i64,
    pub target_table: String,
}

/// `target_column = floor(origin_column / floor_parameter)` for table `internal_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionAttribute {
    pub internal_id: i64,
    pub origin_column: String,
    pub target_column: String,
    pub floor_parameter: i64,
}

/// One scoped session against the store. Dropping it releases the session.
#[cfg_attr(test, mockall::automock)]
pub trait MetadataConnection {
    fn table_mappings(&mut self) -> Result<Vec<TableMapping>, MetadataError>;

    /// Rows for exactly `internal_ids`, ordered by internal id.
    fn partition_attributes(
        &mut self,
        internal_ids: &[i64],
    ) -> Result<Vec<PartitionAttribute>, MetadataError>;
}

pub trait MetadataStore: Send + Sync {
    fn connect(&self) -> Result<Box<dyn MetadataConnection + '_>, MetadataError>;
}

/// Builds the store selected by `config`.
pub fn store_from_config(config: &AppConfig) -> Result<Box<dyn MetadataStore>, MetadataError> {
    match config.metadata_backend {
        MetadataBackend::Yaml => {
            let path = config.metadata_file.as_deref().ok_or_else(|| {
                MetadataError::Unavailable("no metadata file configured".to_string())
            })?;
            Ok(Box::new(YamlMetadataStore::new(path)))
        }
        MetadataBackend::Clickhouse => Ok(Box::new(ClickHouseMetadataStore::from_config(config)?)),
    }
}
