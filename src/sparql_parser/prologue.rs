use nom::{
    bytes::complete::take_while, character::complete::char, combinator::cut, error::context,
    sequence::terminated, IResult, Parser,
};

use super::{
    ast::{PrefixDecl, Prologue},
    common::{is_name_char, keyword, parse_iri_ref, ws},
    errors::SparqlParsingError,
};

/// Parses any number of `BASE` and `PREFIX` declarations.
pub fn parse_prologue(input: &'_ str) -> IResult<&'_ str, Prologue<'_>, SparqlParsingError<'_>> {
    let mut prologue = Prologue::default();
    let mut input = input;

    loop {
        match parse_base_decl(input) {
            Ok((rest, iri)) => {
                prologue.base = Some(iri);
                input = rest;
                continue;
            }
            Err(nom::Err::Error(_)) => {}
            Err(e) => return Err(e),
        }

        match parse_prefix_decl(input) {
            Ok((rest, decl)) => {
                prologue.prefixes.push(decl);
                input = rest;
            }
            Err(nom::Err::Error(_)) => return Ok((input, prologue)),
            Err(e) => return Err(e),
        }
    }
}

fn parse_base_decl(input: &'_ str) -> IResult<&'_ str, &'_ str, SparqlParsingError<'_>> {
    let (input, _) = ws(keyword("BASE")).parse(input)?;
    context("Expected IRI in BASE declaration", cut(ws(parse_iri_ref))).parse(input)
}

fn parse_prefix_decl(input: &'_ str) -> IResult<&'_ str, PrefixDecl<'_>, SparqlParsingError<'_>> {
    let (input, _) = ws(keyword("PREFIX")).parse(input)?;

    let (input, prefix) = context(
        "Expected 'prefix:' in PREFIX declaration",
        cut(terminated(take_while(is_name_char), char(':'))),
    )
    .parse(input)?;

    let (input, iri) = context(
        "Expected namespace IRI in PREFIX declaration",
        cut(ws(parse_iri_ref)),
    )
    .parse(input)?;

    Ok((input, PrefixDecl { prefix, iri }))
}
