use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Failed to read metadata file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse metadata file {path}: {source}")]
    Yaml {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("Metadata query against {table} failed: {source}")]
    Query {
        table: String,
        source: clickhouse::error::Error,
    },

    #[error("Failed to start metadata query runtime: {0}")]
    Runtime(std::io::Error),

    #[error("Metadata store unavailable: {0}")]
    Unavailable(String),
}
