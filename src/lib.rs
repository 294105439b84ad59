//! sparql2sql - SPARQL to SQL translation over triple tables
//!
//! This crate provides:
//! - A SPARQL `SELECT` parser for basic graph patterns
//! - Join graph resolution of triple patterns into per-predicate tables
//! - SQL generation from the resolved join plan
//! - Partition-aware rewriting of relational queries against metadata
//!   stored in YAML or ClickHouse

use log::debug;
use serde::Serialize;

pub mod config;
pub mod metadata_store;
pub mod query_planner;
pub mod render_plan;
pub mod sparql_parser;
pub mod sql_rewriter;

pub use query_planner::{PatternDefect, TranslateError};
pub use render_plan::{RenderPlan, ToSql};
pub use sql_rewriter::{PartitionRewriter, RewriteError, RewriteOutcome};

/// SQL text together with the plan it was rendered from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Translation {
    pub sql: String,
    pub plan: RenderPlan,
}

/// Translate a SPARQL `SELECT` query into a join query over triple tables.
pub fn translate(query_text: &str) -> Result<Translation, TranslateError> {
    let query_plan = query_planner::evaluate_select_query(query_text)?;
    let plan = render_plan::query_plan_to_render_plan(query_plan)?;
    let sql = plan.to_sql();
    debug!("Translated SPARQL into: {}", sql);
    Ok(Translation { sql, plan })
}
