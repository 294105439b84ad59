use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while, take_while1},
    character::complete::{char, digit0, digit1, multispace0, one_of, satisfy},
    combinator::{not, opt, recognize},
    error::ParseError,
    sequence::{delimited, pair},
    IResult, Parser,
};

use super::errors::SparqlParsingError;

pub fn ws<'a, O, E: ParseError<&'a str>, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
{
    delimited(multispace0, inner, multispace0)
}

/// Removes `# ...` comments. A `#` inside an IRI or a string literal is kept,
/// so `<http://example.org/ns#type>` survives.
pub fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_iri = false;
    let mut quote: Option<char> = None;
    let mut in_comment = false;

    for c in input.chars() {
        if in_comment {
            if c == '\n' {
                in_comment = false;
                out.push(c);
            }
            continue;
        }
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') if !in_iri => quote = Some(c),
            (None, '<') => in_iri = true,
            (None, '>') => in_iri = false,
            // `<` also opens a comparison in FILTERs; whitespace cannot occur in an IRI
            (None, c) if in_iri && c.is_whitespace() => in_iri = false,
            (None, '#') if !in_iri => {
                in_comment = true;
                continue;
            }
            _ => {}
        }
        out.push(c);
    }

    out.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

pub fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// Matches a keyword that is not the prefix of a longer name (`a` but not `abc`).
pub fn keyword<'a>(
    word: &'static str,
) -> impl Parser<&'a str, Output = &'a str, Error = SparqlParsingError<'a>> {
    recognize(pair(
        tag_no_case(word),
        not(satisfy(|c: char| is_name_char(c) || c == ':')),
    ))
}

/// `?name` or `$name`; returns the name without its sigil.
pub fn parse_variable(input: &str) -> IResult<&str, &str, SparqlParsingError<'_>> {
    let (input, _) = one_of("?$").parse(input)?;
    take_while1(|c: char| c.is_alphanumeric() || c == '_').parse(input)
}

/// `<iri>`; returns the IRI without angle brackets.
pub fn parse_iri_ref(input: &str) -> IResult<&str, &str, SparqlParsingError<'_>> {
    delimited(
        char('<'),
        take_while(|c: char| c != '>' && !c.is_whitespace()),
        char('>'),
    )
    .parse(input)
}

/// `prefix:local`. The local part may contain dots but never ends with one,
/// so the triple terminator in `?x ub:takesCourse ub:Course0.` is left alone.
pub fn parse_prefixed_name(input: &str) -> IResult<&str, (&str, &str), SparqlParsingError<'_>> {
    let (rest, prefix) = take_while(is_name_char).parse(input)?;
    if prefix.starts_with('-') {
        return Err(nom::Err::Error(SparqlParsingError::at(
            input,
            "Prefix cannot start with '-'",
        )));
    }
    let (rest, _) = char(':').parse(rest)?;
    let (_, local_raw) = take_while(|c: char| is_name_char(c) || c == '.').parse(rest)?;
    let local = local_raw.trim_end_matches('.');
    Ok((&rest[local.len()..], (prefix, local)))
}

/// Quoted string with an optional `@lang` or `^^datatype` suffix. Returns the
/// lexical form only.
pub fn parse_string_literal(input: &str) -> IResult<&str, &str, SparqlParsingError<'_>> {
    let (input, lexical) = alt((
        delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
    ))
    .parse(input)?;

    let (input, _) = opt(alt((
        recognize(pair(char('@'), take_while1(is_name_char))),
        recognize(pair(
            tag("^^"),
            alt((
                recognize(parse_iri_ref),
                recognize(parse_prefixed_name),
            )),
        )),
    )))
    .parse(input)?;

    Ok((input, lexical))
}

/// Integer, decimal or double literal, with an optional sign.
pub fn parse_numeric_literal(input: &str) -> IResult<&str, &str, SparqlParsingError<'_>> {
    recognize((
        opt(one_of("+-")),
        alt((
            recognize((digit1, opt(pair(char('.'), digit1)))),
            recognize(pair(char('.'), digit1)),
        )),
        opt((one_of("eE"), opt(one_of("+-")), digit1, digit0)),
    ))
    .parse(input)
}

pub fn parse_boolean_literal(input: &str) -> IResult<&str, &str, SparqlParsingError<'_>> {
    alt((keyword("true"), keyword("false"))).parse(input)
}
