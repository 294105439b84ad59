use nom::{
    character::complete::{char, multispace0},
    combinator::cut,
    error::context,
    IResult, Parser,
};

use super::{
    ast::{GroupGraphPattern, PatternElement},
    common::{keyword, ws},
    errors::SparqlParsingError,
    triple_pattern::parse_triples_same_subject,
};

const UNSUPPORTED_CONSTRUCTS: [(&str, &str); 7] = [
    ("OPTIONAL", "OPTIONAL graph patterns are not supported"),
    ("FILTER", "FILTER constraints are not supported"),
    ("UNION", "UNION graph patterns are not supported"),
    ("GRAPH", "Named GRAPH patterns are not supported"),
    ("BIND", "BIND assignments are not supported"),
    ("VALUES", "Inline VALUES data is not supported"),
    ("SERVICE", "SERVICE patterns are not supported"),
];

fn unsupported_construct(input: &str) -> Option<&'static str> {
    UNSUPPORTED_CONSTRUCTS
        .iter()
        .find(|&&(word, _)| keyword(word).parse(input).is_ok())
        .map(|&(_, message)| message)
}

/// `{ ... }` containing triples, nested groups and `MINUS` blocks.
pub fn parse_group_graph_pattern(
    input: &'_ str,
) -> IResult<&'_ str, GroupGraphPattern<'_>, SparqlParsingError<'_>> {
    let (mut input, _) = ws(char('{')).parse(input)?;
    let mut elements: Vec<PatternElement<'_>> = Vec::new();

    loop {
        let (rest, _) = multispace0.parse(input)?;
        input = rest;

        if let Ok((rest, _)) = char::<&str, SparqlParsingError<'_>>('}').parse(input) {
            return Ok((rest, GroupGraphPattern { elements }));
        }

        if input.is_empty() {
            return Err(nom::Err::Failure(SparqlParsingError::at(
                input,
                "Unclosed group pattern: expected '}'",
            )));
        }

        if let Some(message) = unsupported_construct(input) {
            return Err(nom::Err::Failure(SparqlParsingError::at(input, message)));
        }

        if let Some(rest) = input.strip_prefix('.') {
            input = rest;
            continue;
        }

        if let Ok((rest, _)) = ws(keyword("MINUS")).parse(input) {
            let (rest, group) =
                context("Error in MINUS block", cut(parse_group_graph_pattern)).parse(rest)?;
            elements.push(PatternElement::Minus(group));
            input = rest;
            continue;
        }

        if input.starts_with('{') {
            let (rest, group) = parse_group_graph_pattern(input)?;
            elements.push(PatternElement::Group(group));
            input = rest;
            continue;
        }

        let (rest, triples) =
            context("Error in triple pattern", cut(parse_triples_same_subject)).parse(input)?;
        match elements.last_mut() {
            Some(PatternElement::Triples(block)) => block.extend(triples),
            _ => elements.push(PatternElement::Triples(triples)),
        }
        input = rest;
    }
}
