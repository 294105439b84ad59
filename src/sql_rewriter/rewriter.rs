use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info, warn};
use serde::Serialize;
use sqlparser::ast::{BinaryOperator, Expr, SetExpr, Statement};

use super::{
    ast_walker::{parse_statement, walk_statement},
    errors::RewriteError,
    partition::{expand, PartitionConstraint},
    rename::rename_tables,
    shape::{Comparison, RelationalQueryShape},
};
use crate::metadata_store::{MetadataConnection, MetadataStore, TableMapping};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSubstitution {
    pub origin_table: String,
    pub target_table: String,
    pub internal_id: i64,
}

/// A comparison left alone because it cannot drive partition pruning.
#[derive(Debug)]
pub struct SkippedPredicate {
    pub comparison: Comparison,
    pub reason: RewriteError,
}

#[derive(Debug)]
pub struct RewriteOutcome {
    pub sql: String,
    pub substitutions: Vec<TableSubstitution>,
    pub constraints: Vec<PartitionConstraint>,
    pub skipped: Vec<SkippedPredicate>,
}

impl RewriteOutcome {
    fn unchanged(sql: &str) -> Self {
        RewriteOutcome {
            sql: sql.to_string(),
            substitutions: Vec::new(),
            constraints: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// Substitutes partitioned tables and appends partition-pruning constraints.
///
/// Holds no state between calls; each `rewrite` opens its own metadata
/// connection and reads a fresh snapshot.
pub struct PartitionRewriter<'s> {
    store: &'s dyn MetadataStore,
}

impl<'s> PartitionRewriter<'s> {
    pub fn new(store: &'s dyn MetadataStore) -> Self {
        PartitionRewriter { store }
    }

    pub fn rewrite(&self, sql: &str) -> Result<RewriteOutcome, RewriteError> {
        let mut statement = parse_statement(sql)?;
        let shape = walk_statement(&statement)?;
        debug!(
            "Query references tables {:?} with {} comparisons",
            shape.tables,
            shape.predicates.len()
        );

        // Released when it goes out of scope, whichever way this returns
        let mut connection = self.store.connect()?;
        rewrite_with(connection.as_mut(), sql, &mut statement, &shape)
    }
}

fn rewrite_with(
    connection: &mut (dyn MetadataConnection + '_),
    sql: &str,
    statement: &mut Statement,
    shape: &RelationalQueryShape,
) -> Result<RewriteOutcome, RewriteError> {
    let mappings = connection.table_mappings()?;

    let mut matched: BTreeMap<&str, &TableMapping> = BTreeMap::new();
    for mapping in &mappings {
        if shape.tables.contains(&mapping.origin_table) {
            matched.entry(mapping.origin_table.as_str()).or_insert(mapping);
        }
    }

    if matched.is_empty() {
        if mappings
            .iter()
            .any(|mapping| shape.tables.contains(&mapping.target_table))
        {
            info!("Query already references partitioned tables; leaving it unchanged");
            return Ok(RewriteOutcome::unchanged(sql));
        }
        return Err(RewriteError::NoPartitionedTable);
    }

    let renames: BTreeMap<String, String> = matched
        .values()
        .map(|mapping| (mapping.origin_table.clone(), mapping.target_table.clone()))
        .collect();
    rename_tables(statement, &renames, &shape.aliases);

    let substitutions: Vec<TableSubstitution> = matched
        .values()
        .map(|mapping| {
            info!(
                "Substituting table {} with {}",
                mapping.origin_table, mapping.target_table
            );
            TableSubstitution {
                origin_table: mapping.origin_table.clone(),
                target_table: mapping.target_table.clone(),
                internal_id: mapping.internal_id,
            }
        })
        .collect();

    let ids: Vec<i64> = matched
        .values()
        .map(|mapping| mapping.internal_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let attributes = connection.partition_attributes(&ids)?;

    let mut constraints = Vec::new();
    let mut skipped = Vec::new();
    for comparison in &shape.predicates {
        let Some(table) = shape.owning_table(&comparison.left) else {
            continue;
        };
        let Some(mapping) = matched.get(table) else {
            continue;
        };
        let Some(attribute) = attributes.iter().find(|attribute| {
            attribute.internal_id == mapping.internal_id
                && attribute.origin_column == comparison.left.column
        }) else {
            continue;
        };

        let qualifier = shape
            .alias_for(&comparison.left, table)
            .unwrap_or(mapping.target_table.as_str());

        match expand(comparison, attribute, qualifier) {
            Ok(Some(constraint)) => {
                debug!("{} restricts partitions to: {}", comparison, constraint);
                constraints.push(constraint);
            }
            Ok(None) => debug!("{} selects no partition; no constraint added", comparison),
            Err(reason) => {
                warn!("Skipping predicate {}: {}", comparison, reason);
                skipped.push(SkippedPredicate {
                    comparison: comparison.clone(),
                    reason,
                });
            }
        }
    }

    conjoin_constraints(statement, &constraints);

    Ok(RewriteOutcome {
        sql: statement.to_string(),
        substitutions,
        constraints,
        skipped,
    })
}

/// `WHERE <existing> AND (<c1>) AND (<c2>) ...`
fn conjoin_constraints(statement: &mut Statement, constraints: &[PartitionConstraint]) {
    let Statement::Query(query) = statement else {
        return;
    };
    let SetExpr::Select(select) = query.body.as_mut() else {
        return;
    };

    for constraint in constraints {
        let expr = constraint.to_expr();
        select.selection = Some(match select.selection.take() {
            Some(existing) => Expr::BinaryOp {
                left: Box::new(existing),
                op: BinaryOperator::And,
                right: Box::new(expr),
            },
            None => expr,
        });
    }
}
