//! Partition rewriting of single-block relational queries.
//!
//! The query is parsed with `sqlparser`, classified into a
//! [`RelationalQueryShape`], then renamed and extended with partition
//! constraints on the AST before being serialized again.

pub mod ast_walker;
mod errors;
pub mod partition;
mod rename;
mod rewriter;
pub mod shape;

pub use errors::{RewriteError, SqlShapeDefect};
pub use partition::{PartitionConstraint, MAX_PARTITIONS};
pub use rewriter::{PartitionRewriter, RewriteOutcome, SkippedPredicate, TableSubstitution};
pub use shape::{ColumnRef, Comparison, ComparisonOp, Literal, RelationalQueryShape};
