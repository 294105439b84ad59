use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// A subject, predicate or object of a triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Term {
    Variable(String),
    /// Full IRI or literal lexical form
    Constant(String),
}

impl Term {
    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Term::Variable(name) => Some(name),
            Term::Constant(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Triple {
    /// Table holding this predicate's `(s, o)` pairs. `None` for a variable predicate.
    pub fn table_name(&self) -> Option<&str> {
        match &self.predicate {
            Term::Constant(iri) => Some(local_name(iri)),
            Term::Variable(_) => None,
        }
    }
}

/// Fragment after the last `#`, or after the last `/` for IRIs without one.
pub fn local_name(iri: &str) -> &str {
    match iri.rfind('#') {
        Some(pos) => &iri[pos + 1..],
        None => after_last_slash(iri),
    }
}

pub fn after_last_slash(value: &str) -> &str {
    match value.rfind('/') {
        Some(pos) => &value[pos + 1..],
        None => value,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    Subject,
    Object,
}

impl Role {
    pub fn column(self) -> &'static str {
        match self {
            Role::Subject => "s",
            Role::Object => "o",
        }
    }

    pub fn opposite(self) -> Role {
        match self {
            Role::Subject => Role::Object,
            Role::Object => Role::Subject,
        }
    }
}

/// Where a variable lives: column `role` of table alias `t<alias_index>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub alias_index: usize,
    pub role: Role,
}

impl Binding {
    pub fn new(alias_index: usize, role: Role) -> Self {
        Binding { alias_index, role }
    }

    pub fn alias(&self) -> String {
        table_alias(self.alias_index)
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}.{}", self.alias_index, self.role.column())
    }
}

pub fn table_alias(alias_index: usize) -> String {
    format!("t{}", alias_index)
}

/// Variable name to its first binding. Iteration follows binding order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VariableBindings {
    order: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, Binding>,
}

impl VariableBindings {
    pub fn get(&self, variable: &str) -> Option<Binding> {
        self.index.get(variable).copied()
    }

    /// Records `binding` unless the variable is already bound. Returns the
    /// binding in effect afterwards and whether it was newly created.
    pub fn bind(&mut self, variable: &str, binding: Binding) -> (Binding, bool) {
        if let Some(existing) = self.index.get(variable) {
            return (*existing, false);
        }
        self.order.push(variable.to_string());
        self.index.insert(variable.to_string(), binding);
        (binding, true)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Binding)> + '_ {
        self.order
            .iter()
            .filter_map(|name| self.index.get(name).map(|b| (name.as_str(), *b)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Equality between two bound columns, rendered `left = right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JoinCondition {
    pub left: Binding,
    pub right: Binding,
}

impl fmt::Display for JoinCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.left, self.right)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinPlanEntry {
    pub table_name: String,
    pub alias_index: usize,
    /// `None` only for the anchor table `t1`
    pub join_condition: Option<JoinCondition>,
    /// Conditions for variables already bound elsewhere when this table was placed
    pub extra_conditions: Vec<JoinCondition>,
}

impl JoinPlanEntry {
    pub fn alias(&self) -> String {
        table_alias(self.alias_index)
    }
}

/// `t<k>.<col> = '<literal>'`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstantPredicate {
    pub binding: Binding,
    pub literal: String,
}

impl fmt::Display for ConstantPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = '{}'", self.binding, self.literal.replace('\'', "''"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinPlan {
    pub entries: Vec<JoinPlanEntry>,
    pub predicates: Vec<ConstantPredicate>,
    pub bindings: VariableBindings,
}

impl JoinPlan {
    pub fn join_condition_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.join_condition.is_some())
            .count()
    }
}
