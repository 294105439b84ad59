use crate::sparql_parser::ast::{
    GroupGraphPattern, PatternElement, Prologue, TermPattern, TriplePattern, RDF_TYPE_IRI,
};

use super::types::{Term, Triple};

/// Triples of `pattern` in document order. Nested groups are flattened;
/// `MINUS` blocks are skipped together with everything inside them.
pub fn extract_triples(prologue: &Prologue<'_>, pattern: &GroupGraphPattern<'_>) -> Vec<Triple> {
    let mut triples = Vec::new();
    collect(prologue, pattern, &mut triples);
    triples
}

fn collect(prologue: &Prologue<'_>, pattern: &GroupGraphPattern<'_>, out: &mut Vec<Triple>) {
    for element in &pattern.elements {
        match element {
            PatternElement::Triples(block) => {
                out.extend(block.iter().map(|triple| to_triple(prologue, triple)))
            }
            PatternElement::Group(group) => collect(prologue, group, out),
            PatternElement::Minus(_) => {}
        }
    }
}

fn to_triple(prologue: &Prologue<'_>, triple: &TriplePattern<'_>) -> Triple {
    Triple {
        subject: to_term(prologue, &triple.subject),
        predicate: to_term(prologue, &triple.predicate),
        object: to_term(prologue, &triple.object),
    }
}

fn to_term(prologue: &Prologue<'_>, term: &TermPattern<'_>) -> Term {
    match term {
        TermPattern::Variable(name) => Term::Variable(name.to_string()),
        TermPattern::Iri(iri) => Term::Constant(prologue.resolve_iri(iri)),
        // Prefixes were checked while parsing; an unknown one keeps its raw text
        TermPattern::PrefixedName { prefix, local } => Term::Constant(
            prologue
                .expand(prefix, local)
                .unwrap_or_else(|| format!("{}:{}", prefix, local)),
        ),
        TermPattern::RdfType => Term::Constant(RDF_TYPE_IRI.to_string()),
        TermPattern::Literal(lexical) => Term::Constant(lexical.to_string()),
    }
}
