use nom::{
    combinator::{cut, opt},
    error::context,
    IResult, Parser,
};

use ast::{SelectQuery, TermPattern};
use common::{keyword, ws};

pub mod ast;
mod common;
pub(crate) mod errors;
mod group_pattern;
mod prologue;
mod select_clause;
mod triple_pattern;

pub use common::strip_comments;
pub use errors::SparqlParsingError;

fn parse_select_query(input: &'_ str) -> IResult<&'_ str, SelectQuery<'_>, SparqlParsingError<'_>> {
    let (input, prologue) = prologue::parse_prologue(input)?;

    let (input, (modifier, projection)) =
        context("Expected SELECT query", select_clause::parse_select_clause).parse(input)?;

    let (input, _) = opt(ws(keyword("WHERE"))).parse(input)?;

    let (input, pattern) = context(
        "Expected '{' to open the graph pattern",
        cut(group_pattern::parse_group_graph_pattern),
    )
    .parse(input)?;

    Ok((
        input,
        SelectQuery {
            prologue,
            modifier,
            projection,
            pattern,
        },
    ))
}

/// Parses a complete SPARQL `SELECT` query. Comments must already be removed
/// with [`strip_comments`].
pub fn parse_query(input: &'_ str) -> Result<SelectQuery<'_>, SparqlParsingError<'_>> {
    let (remainder, query) = match parse_select_query(input) {
        Ok(parsed) => parsed,
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => return Err(e),
        Err(nom::Err::Incomplete(_)) => {
            return Err(SparqlParsingError::at(input, "Incomplete query"))
        }
    };

    let remainder = remainder.trim_start();
    if !remainder.is_empty() {
        // ORDER BY, LIMIT and friends end up here
        return Err(SparqlParsingError::at(
            remainder,
            "Unexpected tokens after query",
        ));
    }

    check_declared_prefixes(&query)?;
    Ok(query)
}

fn check_declared_prefixes<'a>(query: &SelectQuery<'a>) -> Result<(), SparqlParsingError<'a>> {
    for triple in query.pattern.all_triples() {
        for term in [&triple.subject, &triple.predicate, &triple.object] {
            if let TermPattern::PrefixedName { prefix, .. } = term {
                if query.prologue.namespace(prefix).is_none() {
                    return Err(SparqlParsingError::at(*prefix, "Undeclared prefix"));
                }
            }
        }
    }
    Ok(())
}
