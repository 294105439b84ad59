use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use validator::{Validate, ValidationError};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Where partition metadata is read from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataBackend {
    Yaml,
    Clickhouse,
}

#[derive(Debug, Error)]
#[error("unknown metadata backend '{0}' (expected 'yaml' or 'clickhouse')")]
pub struct UnknownBackend(String);

impl FromStr for MetadataBackend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yaml" => Ok(MetadataBackend::Yaml),
            "clickhouse" => Ok(MetadataBackend::Clickhouse),
            _ => Err(UnknownBackend(s.to_string())),
        }
    }
}

impl fmt::Display for MetadataBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataBackend::Yaml => write!(f, "yaml"),
            MetadataBackend::Clickhouse => write!(f, "clickhouse"),
        }
    }
}

/// Application configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
#[validate(schema(function = "validate_backend_settings"))]
pub struct AppConfig {
    pub metadata_backend: MetadataBackend,

    /// YAML metadata document, required by the YAML backend
    #[serde(default)]
    pub metadata_file: Option<String>,

    /// ClickHouse HTTP endpoint, required by the ClickHouse backend
    #[serde(default)]
    pub clickhouse_url: Option<String>,

    #[serde(default = "default_clickhouse_user")]
    pub clickhouse_user: String,

    #[serde(default)]
    pub clickhouse_password: String,

    #[serde(default = "default_clickhouse_database")]
    pub clickhouse_database: String,

    /// Table of `(ID, ORIGIN, TARGET)` rows
    #[validate(length(min = 1, message = "Mapping table name cannot be empty"))]
    #[serde(default = "default_mapping_table")]
    pub mapping_table: String,

    /// Table of `(TBL_ID, ORIGIN_ATTR, TARGET_ATTR, FLOOR_PARAM)` rows
    #[validate(length(min = 1, message = "Partition table name cannot be empty"))]
    #[serde(default = "default_partition_table")]
    pub partition_table: String,
}

fn default_clickhouse_user() -> String {
    "default".to_string()
}

fn default_clickhouse_database() -> String {
    "default".to_string()
}

fn default_mapping_table() -> String {
    "TBL_TRANSFORM".to_string()
}

fn default_partition_table() -> String {
    "PARTITION_INFO".to_string()
}

fn validate_backend_settings(config: &AppConfig) -> Result<(), ValidationError> {
    let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());

    match config.metadata_backend {
        MetadataBackend::Yaml if !present(&config.metadata_file) => Err(ValidationError::new(
            "metadata_file_required",
        )
        .with_message("The yaml backend needs a metadata file".into())),
        MetadataBackend::Clickhouse if !present(&config.clickhouse_url) => Err(
            ValidationError::new("clickhouse_url_required")
                .with_message("The clickhouse backend needs a ClickHouse URL".into()),
        ),
        _ => Ok(()),
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            metadata_backend: MetadataBackend::Yaml,
            metadata_file: Some("metadata.yaml".to_string()),
            clickhouse_url: None,
            clickhouse_user: default_clickhouse_user(),
            clickhouse_password: String::new(),
            clickhouse_database: default_clickhouse_database(),
            mapping_table: default_mapping_table(),
            partition_table: default_partition_table(),
        }
    }
}

impl AppConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::env_values()?;
        config.validate()?;
        Ok(config)
    }

    fn env_values() -> Result<Self, ConfigError> {
        Ok(Self {
            metadata_backend: parse_env_var("SPARQL2SQL_METADATA_BACKEND", "yaml")?,
            metadata_file: Some(
                env::var("SPARQL2SQL_METADATA_FILE").unwrap_or_else(|_| "metadata.yaml".to_string()),
            ),
            clickhouse_url: env::var("CLICKHOUSE_URL").ok(),
            clickhouse_user: env::var("CLICKHOUSE_USER").unwrap_or_else(|_| default_clickhouse_user()),
            clickhouse_password: env::var("CLICKHOUSE_PASSWORD").unwrap_or_default(),
            clickhouse_database: env::var("CLICKHOUSE_DATABASE")
                .unwrap_or_else(|_| default_clickhouse_database()),
            mapping_table: env::var("SPARQL2SQL_MAPPING_TABLE")
                .unwrap_or_else(|_| default_mapping_table()),
            partition_table: env::var("SPARQL2SQL_PARTITION_TABLE")
                .unwrap_or_else(|_| default_partition_table()),
        })
    }

    /// Create configuration from CLI arguments with validation. Values not
    /// given on the command line come from the config file, or from the
    /// environment when there is none.
    pub fn from_cli(cli: CliConfig) -> Result<Self, ConfigError> {
        let mut config = match &cli.config_file {
            Some(path) => Self::read_yaml_file(path)?,
            None => Self::env_values()?,
        };
        config.merge(cli);
        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::read_yaml_file(path)?;
        config.validate()?;
        Ok(config)
    }

    fn read_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })
    }

    /// Apply CLI overrides
    pub fn merge(&mut self, cli: CliConfig) {
        if let Some(backend) = cli.metadata_backend {
            self.metadata_backend = backend;
        }
        if cli.metadata_file.is_some() {
            self.metadata_file = cli.metadata_file;
        }
        if cli.clickhouse_url.is_some() {
            self.clickhouse_url = cli.clickhouse_url;
        }
    }
}

/// CLI configuration (parsed from command line arguments)
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub config_file: Option<std::path::PathBuf>,
    pub metadata_backend: Option<MetadataBackend>,
    pub metadata_file: Option<String>,
    pub clickhouse_url: Option<String>,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
