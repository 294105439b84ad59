use log::debug;

use super::{MetadataConnection, MetadataError, MetadataStore, PartitionAttribute, TableMapping};

/// Metadata held in process, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMetadataStore {
    mappings: Vec<TableMapping>,
    attributes: Vec<PartitionAttribute>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mapping(mut self, origin_table: &str, internal_id: i64, target_table: &str) -> Self {
        self.mappings.push(TableMapping {
            origin_table: origin_table.to_string(),
            internal_id,
            target_table: target_table.to_string(),
        });
        self
    }

    pub fn with_attribute(
        mut self,
        internal_id: i64,
        origin_column: &str,
        target_column: &str,
        floor_parameter: i64,
    ) -> Self {
        self.attributes.push(PartitionAttribute {
            internal_id,
            origin_column: origin_column.to_string(),
            target_column: target_column.to_string(),
            floor_parameter,
        });
        self
    }
}

impl MetadataStore for InMemoryMetadataStore {
    fn connect(&self) -> Result<Box<dyn MetadataConnection + '_>, MetadataError> {
        Ok(Box::new(SnapshotConnection::new(
            "in-memory",
            self.mappings.clone(),
            self.attributes.clone(),
        )))
    }
}

/// Connection over rows already loaded into memory.
#[derive(Debug)]
pub struct SnapshotConnection {
    source: &'static str,
    mappings: Vec<TableMapping>,
    attributes: Vec<PartitionAttribute>,
}

impl SnapshotConnection {
    pub fn new(
        source: &'static str,
        mappings: Vec<TableMapping>,
        attributes: Vec<PartitionAttribute>,
    ) -> Self {
        debug!(
            "Opened {} metadata connection ({} mappings, {} partition attributes)",
            source,
            mappings.len(),
            attributes.len()
        );
        SnapshotConnection {
            source,
            mappings,
            attributes,
        }
    }
}

impl MetadataConnection for SnapshotConnection {
    fn table_mappings(&mut self) -> Result<Vec<TableMapping>, MetadataError> {
        Ok(self.mappings.clone())
    }

    fn partition_attributes(
        &mut self,
        internal_ids: &[i64],
    ) -> Result<Vec<PartitionAttribute>, MetadataError> {
        let mut rows: Vec<PartitionAttribute> = self
            .attributes
            .iter()
            .filter(|attribute| internal_ids.contains(&attribute.internal_id))
            .cloned()
            .collect();
        rows.sort_by_key(|attribute| attribute.internal_id);
        Ok(rows)
    }
}

impl Drop for SnapshotConnection {
    fn drop(&mut self) {
        debug!("Released {} metadata connection", self.source);
    }
}
