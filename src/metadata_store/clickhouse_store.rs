use clickhouse::Client;
use log::debug;
use serde::Deserialize;
use tokio::runtime::{Builder, Runtime};

use super::{MetadataConnection, MetadataError, MetadataStore, PartitionAttribute, TableMapping};
use crate::config::AppConfig;

/// Metadata held in two ClickHouse tables, `(ID, ORIGIN, TARGET)` and
/// `(TBL_ID, ORIGIN_ATTR, TARGET_ATTR, FLOOR_PARAM)`.
///
/// Queries run on a current-thread runtime owned by each connection, so the
/// store must not be used from inside another tokio runtime.
#[derive(Clone)]
pub struct ClickHouseMetadataStore {
    client: Client,
    mapping_table: String,
    partition_table: String,
}

impl ClickHouseMetadataStore {
    pub fn new(client: Client, mapping_table: &str, partition_table: &str) -> Self {
        ClickHouseMetadataStore {
            client,
            mapping_table: mapping_table.to_string(),
            partition_table: partition_table.to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, MetadataError> {
        let url = config.clickhouse_url.as_deref().ok_or_else(|| {
            MetadataError::Unavailable("no ClickHouse URL configured".to_string())
        })?;

        let client = Client::default()
            .with_url(url)
            .with_user(config.clickhouse_user.as_str())
            .with_password(config.clickhouse_password.as_str())
            .with_database(config.clickhouse_database.as_str());

        Ok(Self::new(client, &config.mapping_table, &config.partition_table))
    }
}

impl MetadataStore for ClickHouseMetadataStore {
    fn connect(&self) -> Result<Box<dyn MetadataConnection + '_>, MetadataError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(MetadataError::Runtime)?;
        debug!("Opened ClickHouse metadata connection");
        Ok(Box::new(ClickHouseConnection {
            store: self,
            runtime,
        }))
    }
}

struct ClickHouseConnection<'s> {
    store: &'s ClickHouseMetadataStore,
    runtime: Runtime,
}

#[derive(Debug, clickhouse::Row, Deserialize)]
struct MappingRow {
    origin: String,
    id: i64,
    target: String,
}

#[derive(Debug, clickhouse::Row, Deserialize)]
struct PartitionInfoRow {
    tbl_id: i64,
    origin_attr: String,
    target_attr: String,
    floor_param: i64,
}

fn partition_info_query(table: &str, internal_ids: &[i64]) -> String {
    let ids = internal_ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "SELECT toInt64(TBL_ID) AS tbl_id, ORIGIN_ATTR AS origin_attr, TARGET_ATTR AS target_attr, \
         toInt64(FLOOR_PARAM) AS floor_param FROM {} WHERE TBL_ID IN ({}) ORDER BY TBL_ID",
        table, ids
    )
}

impl MetadataConnection for ClickHouseConnection<'_> {
    fn table_mappings(&mut self) -> Result<Vec<TableMapping>, MetadataError> {
        let table = &self.store.mapping_table;
        let query = format!(
            "SELECT ORIGIN AS origin, toInt64(ID) AS id, TARGET AS target FROM {}",
            table
        );
        debug!("Querying table mappings: {}", query);

        let rows: Vec<MappingRow> = self
            .runtime
            .block_on(self.store.client.query(&query).fetch_all())
            .map_err(|source| MetadataError::Query {
                table: table.clone(),
                source,
            })?;

        Ok(rows
            .into_iter()
            .map(|row| TableMapping {
                origin_table: row.origin,
                internal_id: row.id,
                target_table: row.target,
            })
            .collect())
    }

    fn partition_attributes(
        &mut self,
        internal_ids: &[i64],
    ) -> Result<Vec<PartitionAttribute>, MetadataError> {
        if internal_ids.is_empty() {
            return Ok(Vec::new());
        }

        let table = &self.store.partition_table;
        let query = partition_info_query(table, internal_ids);
        debug!("Querying partition attributes: {}", query);

        let rows: Vec<PartitionInfoRow> = self
            .runtime
            .block_on(self.store.client.query(&query).fetch_all())
            .map_err(|source| MetadataError::Query {
                table: table.clone(),
                source,
            })?;

        Ok(rows
            .into_iter()
            .map(|row| PartitionAttribute {
                internal_id: row.tbl_id,
                origin_column: row.origin_attr,
                target_column: row.target_attr,
                floor_parameter: row.floor_param,
            })
            .collect())
    }
}

impl Drop for ClickHouseConnection<'_> {
    fn drop(&mut self) {
        debug!("Released ClickHouse metadata connection");
    }
}
