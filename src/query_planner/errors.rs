use thiserror::Error;

use crate::render_plan::errors::RenderBuildError;

/// Why a graph pattern cannot be turned into a join plan.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PatternDefect {
    #[error("empty pattern")]
    Empty,

    #[error("variable predicate in triple {0}")]
    VariablePredicate(usize),

    #[error("both terms concrete in triple {0}")]
    BothTermsConcrete(usize),

    #[error("disconnected pattern: triple {0} shares no variable with the anchor triple")]
    Disconnected(usize),

    #[error("missing SELECT/WHERE")]
    MissingSelectWhere,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TranslateError {
    #[error("Malformed pattern: {0}")]
    MalformedPattern(PatternDefect),

    #[error("Unresolved projection: variable '{0}' is not bound in the graph pattern")]
    UnresolvedProjection(String),

    #[error("SPARQL parse error:\n{0}")]
    Parse(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderBuildError),
}

impl From<PatternDefect> for TranslateError {
    fn from(defect: PatternDefect) -> Self {
        TranslateError::MalformedPattern(defect)
    }
}
