use std::fmt;

use serde::Serialize;
use sqlparser::ast::{BinaryOperator, Expr, Ident, Value};

use super::{
    errors::RewriteError,
    shape::{Comparison, ComparisonOp, Literal},
};
use crate::metadata_store::PartitionAttribute;

/// Widest `<`/`<=` range expanded into a disjunction.
pub const MAX_PARTITIONS: i64 = 128;

/// Disjunction `column = v0 or column = v1 ...` over partition numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionConstraint {
    /// Qualified target column, e.g. `tbl2.fid`
    pub column: String,
    pub partitions: Vec<i64>,
}

impl fmt::Display for PartitionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms = self
            .partitions
            .iter()
            .map(|partition| format!("{} = {}", self.column, partition))
            .collect::<Vec<_>>();
        f.write_str(&terms.join(" or "))
    }
}

impl PartitionConstraint {
    /// Parenthesized expression ready to be conjoined to a WHERE clause.
    pub fn to_expr(&self) -> Expr {
        let column = Expr::CompoundIdentifier(self.column.split('.').map(Ident::new).collect());
        let equality = |partition: &i64| Expr::BinaryOp {
            left: Box::new(column.clone()),
            op: BinaryOperator::Eq,
            right: Box::new(Expr::Value(Value::Number(partition.to_string(), false))),
        };

        let terms: Vec<Expr> = self.partitions.iter().map(equality).collect();

        Expr::Nested(Box::new(
            balanced_disjunction(&terms).unwrap_or(Expr::Value(Value::Boolean(true))),
        ))
    }
}

/// `OR` tree of depth log2(n); renders the same flat text as a left-deep one.
fn balanced_disjunction(terms: &[Expr]) -> Option<Expr> {
    match terms {
        [] => None,
        [single] => Some(single.clone()),
        _ => {
            let (left, right) = terms.split_at(terms.len() / 2);
            Some(Expr::BinaryOp {
                left: Box::new(balanced_disjunction(left)?),
                op: BinaryOperator::Or,
                right: Box::new(balanced_disjunction(right)?),
            })
        }
    }
}

/// Partition number holding `value` under `floor(value / floor_parameter)`.
fn partition_of(value: &Literal, floor_parameter: i64) -> Option<i64> {
    match value {
        Literal::Integer(value) => Some(value.div_euclid(floor_parameter)),
        Literal::Float(value) => Some((value / floor_parameter as f64).floor() as i64),
        Literal::String(_) | Literal::Identifier(_) => None,
    }
}

/// Partitions `0..end`, refusing ranges wider than [`MAX_PARTITIONS`].
fn partition_range(column: &str, end: i64) -> Result<Vec<i64>, RewriteError> {
    if end > MAX_PARTITIONS {
        return Err(RewriteError::PartitionRangeTooLarge {
            column: column.to_string(),
            partitions: end,
            limit: MAX_PARTITIONS,
        });
    }
    Ok((0..end).collect())
}

/// Expands a comparison on a partitioned origin column into the partitions it
/// can touch. `Ok(None)` means the range is empty and no constraint applies.
pub fn expand(
    comparison: &Comparison,
    attribute: &PartitionAttribute,
    qualifier: &str,
) -> Result<Option<PartitionConstraint>, RewriteError> {
    let column = comparison.left.to_string();

    if attribute.floor_parameter <= 0 {
        return Err(RewriteError::InvalidFloorParameter {
            column,
            floor_parameter: attribute.floor_parameter,
        });
    }

    let k = partition_of(&comparison.right, attribute.floor_parameter).ok_or_else(|| {
        RewriteError::UnsupportedLiteralType {
            column: column.clone(),
            literal: comparison.right.to_string(),
        }
    })?;

    let partitions: Vec<i64> = match comparison.op {
        ComparisonOp::Eq => vec![k],
        ComparisonOp::Lt => partition_range(&column, k)?,
        ComparisonOp::Le => partition_range(&column, k.saturating_add(1))?,
        ComparisonOp::Gt | ComparisonOp::Ge | ComparisonOp::Ne => {
            return Err(RewriteError::UnsupportedOperator {
                column,
                operator: comparison.op.to_string(),
            })
        }
    };

    if partitions.is_empty() {
        return Ok(None);
    }

    Ok(Some(PartitionConstraint {
        column: format!("{}.{}", qualifier, attribute.target_column),
        partitions,
    }))
}
