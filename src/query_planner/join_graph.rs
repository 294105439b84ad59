use log::debug;

use super::{
    connectivity::check_connected,
    errors::PatternDefect,
    types::{
        after_last_slash, local_name, Binding, ConstantPredicate, JoinCondition, JoinPlan,
        JoinPlanEntry, Role, Term, Triple, VariableBindings,
    },
};

/// Builds the join plan for a basic graph pattern.
///
/// Triple 0 becomes `t1`. Every later triple is placed, in source order over
/// repeated passes, as soon as one of its subject/object variables is bound,
/// and joins on that variable's first binding.
pub fn resolve(triples: &[Triple]) -> Result<JoinPlan, PatternDefect> {
    let Some(anchor) = triples.first() else {
        return Err(PatternDefect::Empty);
    };

    if let Some(index) = triples.iter().position(|t| t.table_name().is_none()) {
        return Err(PatternDefect::VariablePredicate(index));
    }

    if anchor.subject.as_variable().is_none() && anchor.object.as_variable().is_none() {
        return Err(PatternDefect::BothTermsConcrete(0));
    }

    check_connected(triples)?;

    let mut resolver = JoinGraphResolver::default();
    resolver.place_anchor(anchor);

    let mut pending: Vec<usize> = (1..triples.len()).collect();
    while !pending.is_empty() {
        let before = pending.len();
        pending.retain(|&index| !resolver.try_place(&triples[index]));

        if pending.len() == before {
            return Err(PatternDefect::Disconnected(pending[0]));
        }
    }

    debug!(
        "Resolved {} triples into {} joins and {} constant predicates",
        triples.len(),
        resolver.entries.len().saturating_sub(1),
        resolver.predicates.len()
    );

    Ok(JoinPlan {
        entries: resolver.entries,
        predicates: resolver.predicates,
        bindings: resolver.bindings,
    })
}

#[derive(Default)]
struct JoinGraphResolver {
    entries: Vec<JoinPlanEntry>,
    predicates: Vec<ConstantPredicate>,
    bindings: VariableBindings,
}

impl JoinGraphResolver {
    fn next_alias_index(&self) -> usize {
        self.entries.len() + 1
    }

    fn place_anchor(&mut self, triple: &Triple) {
        let mut entry = self.new_entry(triple, None);
        self.bind_side(triple, &mut entry, Role::Subject);
        self.bind_side(triple, &mut entry, Role::Object);
        self.entries.push(entry);
    }

    /// Places `triple` if its subject or object variable is already bound.
    fn try_place(&mut self, triple: &Triple) -> bool {
        let bound = |term: &Term| term.as_variable().and_then(|v| self.bindings.get(v));

        let (join_role, existing) = match (bound(&triple.subject), bound(&triple.object)) {
            (Some(existing), _) => (Role::Subject, existing),
            (None, Some(existing)) => (Role::Object, existing),
            (None, None) => return false,
        };

        let alias_index = self.next_alias_index();
        let condition = JoinCondition {
            left: existing,
            right: Binding::new(alias_index, join_role),
        };
        let mut entry = self.new_entry(triple, Some(condition));
        self.bind_side(triple, &mut entry, join_role.opposite());

        debug!(
            "Joined {} as {} on {}",
            entry.table_name,
            entry.alias(),
            condition
        );
        self.entries.push(entry);
        true
    }

    fn new_entry(&self, triple: &Triple, join_condition: Option<JoinCondition>) -> JoinPlanEntry {
        JoinPlanEntry {
            table_name: triple.table_name().unwrap_or_default().to_string(),
            alias_index: self.next_alias_index(),
            join_condition,
            extra_conditions: Vec::new(),
        }
    }

    /// Handles the `role` side of `triple` placed as `entry`: a constant
    /// becomes a predicate, a fresh variable a binding, and a variable bound
    /// earlier an extra equality against its first binding.
    fn bind_side(&mut self, triple: &Triple, entry: &mut JoinPlanEntry, role: Role) {
        let here = Binding::new(entry.alias_index, role);
        let term = match role {
            Role::Subject => &triple.subject,
            Role::Object => &triple.object,
        };

        match term {
            Term::Constant(value) => self.predicates.push(ConstantPredicate {
                binding: here,
                literal: render_literal(&entry.table_name, role, value).to_string(),
            }),
            Term::Variable(name) => {
                let (first, created) = self.bindings.bind(name, here);
                if !created {
                    entry.extra_conditions.push(JoinCondition {
                        left: first,
                        right: here,
                    });
                }
            }
        }
    }
}

/// Objects of the `type` table keep their local name; every other constant
/// keeps the fragment after its last `/`.
fn render_literal<'v>(table_name: &str, role: Role, value: &'v str) -> &'v str {
    if table_name == "type" && role == Role::Object {
        local_name(value)
    } else {
        after_last_slash(value)
    }
}
