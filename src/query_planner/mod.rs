use log::debug;

use crate::sparql_parser::{ast::SelectModifier, parse_query, strip_comments};

pub mod connectivity;
mod errors;
pub mod join_graph;
pub mod pattern_extractor;
pub mod projection;
pub mod types;

pub use errors::{PatternDefect, TranslateError};
pub use projection::ProjectionItem;
pub use types::JoinPlan;

/// Everything needed to render a SPARQL `SELECT` as SQL.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub distinct: bool,
    pub projection: Vec<ProjectionItem>,
    pub join_plan: JoinPlan,
}

pub fn evaluate_select_query(query_text: &str) -> Result<QueryPlan, TranslateError> {
    let cleaned = strip_comments(query_text);
    let query = parse_query(&cleaned).map_err(|e| TranslateError::Parse(e.to_string()))?;

    let triples = pattern_extractor::extract_triples(&query.prologue, &query.pattern);
    debug!("Extracted {} triples from graph pattern", triples.len());

    let join_plan = join_graph::resolve(&triples)?;
    let projection = projection::resolve_projection(&cleaned, &join_plan.bindings)?;

    Ok(QueryPlan {
        distinct: query.modifier == Some(SelectModifier::Distinct),
        projection,
        join_plan,
    })
}
