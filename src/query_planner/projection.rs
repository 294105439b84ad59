use lazy_static::lazy_static;
use regex::{Match, Regex};
use serde::Serialize;

use super::{
    errors::{PatternDefect, TranslateError},
    types::{Binding, VariableBindings},
};

lazy_static! {
    // The keyword is group 1; a leading `?`/`$` makes it a variable name
    static ref SELECT_KEYWORD: Regex = Regex::new(r"(?i)(?:^|[^\w?$])(select)\b").unwrap();
    static ref WHERE_KEYWORD: Regex = Regex::new(r"(?i)(?:^|[^\w?$])(where)\b").unwrap();
}

fn keyword_match<'t>(keyword: &Regex, text: &'t str) -> Option<Match<'t>> {
    keyword.captures(text).and_then(|captures| captures.get(1))
}

/// One projected column: the user's variable and the column it resolves to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionItem {
    pub variable: String,
    pub binding: Binding,
}

/// Resolves the variables listed between `SELECT` and `WHERE` in `query_text`,
/// in the order the user wrote them.
pub fn resolve_projection(
    query_text: &str,
    bindings: &VariableBindings,
) -> Result<Vec<ProjectionItem>, TranslateError> {
    let select =
        keyword_match(&SELECT_KEYWORD, query_text).ok_or(PatternDefect::MissingSelectWhere)?;
    let where_ =
        keyword_match(&WHERE_KEYWORD, query_text).ok_or(PatternDefect::MissingSelectWhere)?;
    if where_.start() < select.end() {
        return Err(PatternDefect::MissingSelectWhere.into());
    }

    let mut items = Vec::new();
    for token in query_text[select.end()..where_.start()]
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
    {
        if token.eq_ignore_ascii_case("distinct") || token.eq_ignore_ascii_case("reduced") {
            continue;
        }

        if token == "*" {
            items.extend(bindings.iter().map(|(variable, binding)| ProjectionItem {
                variable: variable.to_string(),
                binding,
            }));
            continue;
        }

        let variable = token.trim_start_matches(['?', '$']);
        let binding = bindings
            .get(variable)
            .ok_or_else(|| TranslateError::UnresolvedProjection(token.to_string()))?;
        items.push(ProjectionItem {
            variable: variable.to_string(),
            binding,
        });
    }

    Ok(items)
}
