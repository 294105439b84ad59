use nom::error::{ContextError, ParseError};
use std::fmt;

#[derive(Debug, PartialEq)]
pub struct SparqlParsingError<'a> {
    pub errors: Vec<(&'a str, &'static str)>,
}

impl<'a> SparqlParsingError<'a> {
    pub fn at(input: &'a str, ctx: &'static str) -> Self {
        SparqlParsingError {
            errors: vec![(input, ctx)],
        }
    }
}

impl<'a> ParseError<&'a str> for SparqlParsingError<'a> {
    fn from_error_kind(input: &'a str, _kind: nom::error::ErrorKind) -> Self {
        SparqlParsingError {
            errors: vec![(input, "unknown error")],
        }
    }

    fn append(input: &'a str, _kind: nom::error::ErrorKind, mut other: Self) -> Self {
        other.errors.push((input, "unknown error (appended)"));
        other
    }
}

impl<'a> ContextError<&'a str> for SparqlParsingError<'a> {
    fn add_context(input: &'a str, ctx: &'static str, mut other: Self) -> Self {
        other.errors.push((input, ctx));
        other
    }
}

impl fmt::Display for SparqlParsingError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only the head of the remaining input is useful in a message
        for (input, ctx) in &self.errors {
            let snippet: String = input.chars().take(40).collect();
            writeln!(f, "{}: {}", ctx, snippet.trim_end())?;
        }
        Ok(())
    }
}

impl<'a> From<nom::error::Error<&'a str>> for SparqlParsingError<'a> {
    fn from(err: nom::error::Error<&'a str>) -> Self {
        SparqlParsingError {
            errors: vec![(err.input, "Unable to parse")],
        }
    }
}
