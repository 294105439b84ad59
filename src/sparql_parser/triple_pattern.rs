use nom::{
    branch::alt,
    character::complete::char,
    combinator::{cut, map, value},
    error::context,
    multi::separated_list1,
    IResult, Parser,
};

use super::{
    ast::{TermPattern, TriplePattern},
    common::{
        keyword, parse_boolean_literal, parse_iri_ref, parse_numeric_literal,
        parse_prefixed_name, parse_string_literal, parse_variable, ws,
    },
    errors::SparqlParsingError,
};

/// One subject followed by a `;`-separated predicate list, each predicate
/// carrying a `,`-separated object list. Expands to one triple per object.
pub fn parse_triples_same_subject(
    input: &'_ str,
) -> IResult<&'_ str, Vec<TriplePattern<'_>>, SparqlParsingError<'_>> {
    let (input, subject) = context("Expected subject", ws(parse_subject)).parse(input)?;
    let (input, pairs) = context(
        "Expected predicate and object after subject",
        cut(parse_predicate_object_list),
    )
    .parse(input)?;

    let triples = pairs
        .into_iter()
        .map(|(predicate, object)| TriplePattern {
            subject: subject.clone(),
            predicate,
            object,
        })
        .collect();
    Ok((input, triples))
}

type VerbObject<'a> = (TermPattern<'a>, TermPattern<'a>);

fn parse_predicate_object_list(
    input: &'_ str,
) -> IResult<&'_ str, Vec<VerbObject<'_>>, SparqlParsingError<'_>> {
    let (mut input, mut pairs) = parse_verb_objects(input)?;

    loop {
        let Ok((rest, _)) = ws(char::<&str, SparqlParsingError<'_>>(';')).parse(input) else {
            break;
        };
        input = rest;
        // A trailing `;` before `.` or `}` is legal
        match parse_verb_objects(input) {
            Ok((rest, more)) => {
                pairs.extend(more);
                input = rest;
            }
            Err(nom::Err::Error(_)) => {}
            Err(e) => return Err(e),
        }
    }

    Ok((input, pairs))
}

fn parse_verb_objects(input: &'_ str) -> IResult<&'_ str, Vec<VerbObject<'_>>, SparqlParsingError<'_>> {
    let (input, verb) = ws(parse_verb).parse(input)?;
    let (input, objects) = context(
        "Expected object",
        cut(separated_list1(ws(char(',')), ws(parse_object))),
    )
    .parse(input)?;

    Ok((
        input,
        objects
            .into_iter()
            .map(|object| (verb.clone(), object))
            .collect(),
    ))
}

fn parse_named_term(input: &'_ str) -> IResult<&'_ str, TermPattern<'_>, SparqlParsingError<'_>> {
    alt((
        map(parse_variable, TermPattern::Variable),
        map(parse_iri_ref, TermPattern::Iri),
        map(parse_prefixed_name, |(prefix, local)| {
            TermPattern::PrefixedName { prefix, local }
        }),
    ))
    .parse(input)
}

fn parse_subject(input: &'_ str) -> IResult<&'_ str, TermPattern<'_>, SparqlParsingError<'_>> {
    parse_named_term(input)
}

fn parse_verb(input: &'_ str) -> IResult<&'_ str, TermPattern<'_>, SparqlParsingError<'_>> {
    alt((value(TermPattern::RdfType, keyword("a")), parse_named_term)).parse(input)
}

fn parse_object(input: &'_ str) -> IResult<&'_ str, TermPattern<'_>, SparqlParsingError<'_>> {
    alt((
        map(parse_string_literal, TermPattern::Literal),
        parse_named_term,
        map(parse_numeric_literal, TermPattern::Literal),
        map(parse_boolean_literal, TermPattern::Literal),
    ))
    .parse(input)
}
