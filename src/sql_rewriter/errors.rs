use thiserror::Error;

use crate::metadata_store::MetadataError;

/// What makes a relational query unsuitable for partition rewriting.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SqlShapeDefect {
    #[error("nested subquery")]
    NestedSubquery,

    #[error("unsupported expression: {0}")]
    UnsupportedExpression(String),

    #[error("expected a SELECT query, found {0}")]
    NotASelect(String),

    #[error("expected exactly one statement, found {0}")]
    StatementCount(usize),

    #[error("unsupported relation: {0}")]
    UnsupportedRelation(String),
}

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("Malformed SQL shape: {0}")]
    MalformedSqlShape(SqlShapeDefect),

    #[error("No partitioned table is referenced by the query")]
    NoPartitionedTable,

    #[error("Unsupported literal type for partitioned column {column}: {literal}")]
    UnsupportedLiteralType { column: String, literal: String },

    #[error("Unsupported operator '{operator}' for partitioned column {column}")]
    UnsupportedOperator { column: String, operator: String },

    #[error("Range on partitioned column {column} spans {partitions} partitions, more than {limit}")]
    PartitionRangeTooLarge {
        column: String,
        partitions: i64,
        limit: i64,
    },

    #[error("Invalid floor parameter {floor_parameter} for partitioned column {column}")]
    InvalidFloorParameter { column: String, floor_parameter: i64 },

    #[error("SQL parse error: {0}")]
    SqlParse(#[from] sqlparser::parser::ParserError),

    #[error("Metadata store error: {0}")]
    Metadata(#[from] MetadataError),
}

impl From<SqlShapeDefect> for RewriteError {
    fn from(defect: SqlShapeDefect) -> Self {
        RewriteError::MalformedSqlShape(defect)
    }
}
