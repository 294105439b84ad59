/// Full IRI the `a` keyword abbreviates.
pub const RDF_TYPE_IRI: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// A parsed `SELECT` query over a single basic graph pattern tree.
#[derive(Debug, PartialEq, Clone)]
pub struct SelectQuery<'a> {
    pub prologue: Prologue<'a>,
    pub modifier: Option<SelectModifier>,
    pub projection: Projection<'a>,
    pub pattern: GroupGraphPattern<'a>,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum SelectModifier {
    Distinct,
    Reduced,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Projection<'a> {
    /// `SELECT *`
    All,
    /// Variable names without their `?`/`$` sigil
    Variables(Vec<&'a str>),
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Prologue<'a> {
    pub base: Option<&'a str>,
    pub prefixes: Vec<PrefixDecl<'a>>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct PrefixDecl<'a> {
    /// Prefix label without the trailing colon; empty for the default prefix
    pub prefix: &'a str,
    pub iri: &'a str,
}

impl<'a> Prologue<'a> {
    /// Namespace IRI bound to `prefix`. Later declarations win, as in SPARQL.
    pub fn namespace(&self, prefix: &str) -> Option<&'a str> {
        self.prefixes
            .iter()
            .rev()
            .find(|decl| decl.prefix == prefix)
            .map(|decl| decl.iri)
    }

    pub fn expand(&self, prefix: &str, local: &str) -> Option<String> {
        self.namespace(prefix)
            .map(|namespace| format!("{}{}", namespace, local))
    }

    /// Resolves a relative IRI reference against `BASE`, if one is declared.
    pub fn resolve_iri(&self, iri: &str) -> String {
        match self.base {
            Some(base) if !iri.contains(':') => format!("{}{}", base, iri),
            _ => iri.to_string(),
        }
    }
}

/// `{ ... }` block. Elements keep document order.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct GroupGraphPattern<'a> {
    pub elements: Vec<PatternElement<'a>>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum PatternElement<'a> {
    /// Consecutive triples not interrupted by a nested block
    Triples(Vec<TriplePattern<'a>>),
    Group(GroupGraphPattern<'a>),
    Minus(GroupGraphPattern<'a>),
}

#[derive(Debug, PartialEq, Clone)]
pub struct TriplePattern<'a> {
    pub subject: TermPattern<'a>,
    pub predicate: TermPattern<'a>,
    pub object: TermPattern<'a>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum TermPattern<'a> {
    Variable(&'a str),
    Iri(&'a str),
    PrefixedName { prefix: &'a str, local: &'a str },
    /// The `a` keyword
    RdfType,
    /// Lexical form of a string, numeric or boolean literal
    Literal(&'a str),
}

impl<'a> GroupGraphPattern<'a> {
    /// Every triple in the tree, including the ones under `MINUS`.
    pub fn all_triples(&self) -> Vec<&TriplePattern<'a>> {
        let mut out = Vec::new();
        for element in &self.elements {
            match element {
                PatternElement::Triples(triples) => out.extend(triples.iter()),
                PatternElement::Group(group) | PatternElement::Minus(group) => {
                    out.extend(group.all_triples())
                }
            }
        }
        out
    }
}
