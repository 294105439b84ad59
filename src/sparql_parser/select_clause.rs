use nom::{
    branch::alt,
    character::complete::char,
    combinator::{cut, map, opt, value},
    error::context,
    multi::many1,
    sequence::terminated,
    IResult, Parser,
};

use super::{
    ast::{Projection, SelectModifier},
    common::{keyword, parse_variable, ws},
    errors::SparqlParsingError,
};

/// `SELECT [DISTINCT|REDUCED] (* | ?v [,] ...)`
pub fn parse_select_clause(
    input: &'_ str,
) -> IResult<&'_ str, (Option<SelectModifier>, Projection<'_>), SparqlParsingError<'_>> {
    let (input, _) = ws(keyword("SELECT")).parse(input)?;

    let (input, modifier) = opt(ws(alt((
        value(SelectModifier::Distinct, keyword("DISTINCT")),
        value(SelectModifier::Reduced, keyword("REDUCED")),
    ))))
    .parse(input)?;

    let (input, projection) = context(
        "Error in SELECT clause: expected '*' or a list of variables",
        cut(alt((
            value(Projection::All, ws(char('*'))),
            map(
                many1(terminated(ws(parse_variable), opt(ws(char(','))))),
                Projection::Variables,
            ),
        ))),
    )
    .parse(input)?;

    Ok((input, (modifier, projection)))
}
