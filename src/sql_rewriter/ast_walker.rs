use std::ops::ControlFlow;

use sqlparser::{
    ast::{
        visit_expressions, BinaryOperator, Expr, Query, SetExpr, Statement, TableFactor,
        TableWithJoins, UnaryOperator, Value,
    },
    dialect::GenericDialect,
    parser::Parser,
};

use super::{
    errors::{RewriteError, SqlShapeDefect},
    shape::{ColumnRef, Comparison, ComparisonOp, Literal, RelationalQueryShape},
};

/// Parses `sql`, which must hold exactly one statement.
pub fn parse_statement(sql: &str) -> Result<Statement, RewriteError> {
    let mut statements = Parser::parse_sql(&GenericDialect {}, sql)?;
    match statements.len() {
        1 => Ok(statements.remove(0)),
        count => Err(SqlShapeDefect::StatementCount(count).into()),
    }
}

/// Classifies a single-block `SELECT` into projection, tables and normalized
/// comparisons.
pub fn walk_statement(statement: &Statement) -> Result<RelationalQueryShape, RewriteError> {
    let Statement::Query(query) = statement else {
        return Err(SqlShapeDefect::NotASelect(statement_kind(statement)).into());
    };

    let nested = visit_expressions(statement, |expr| match expr {
        Expr::Subquery(_) | Expr::InSubquery { .. } | Expr::Exists { .. } => {
            ControlFlow::Break(())
        }
        _ => ControlFlow::Continue(()),
    });
    if nested.is_break() {
        return Err(SqlShapeDefect::NestedSubquery.into());
    }

    walk_query(query)
}

fn statement_kind(statement: &Statement) -> String {
    statement
        .to_string()
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}

fn walk_query(query: &Query) -> Result<RelationalQueryShape, RewriteError> {
    if query.with.is_some() {
        return Err(SqlShapeDefect::NestedSubquery.into());
    }

    let select = match query.body.as_ref() {
        SetExpr::Select(select) => select,
        SetExpr::Query(_) => return Err(SqlShapeDefect::NestedSubquery.into()),
        SetExpr::SetOperation { op, .. } => {
            return Err(SqlShapeDefect::UnsupportedExpression(op.to_string()).into())
        }
        other => return Err(SqlShapeDefect::NotASelect(other.to_string()).into()),
    };

    let mut shape = RelationalQueryShape {
        projection: select.projection.iter().map(|item| item.to_string()).collect(),
        ..Default::default()
    };

    for table_with_joins in &select.from {
        collect_tables(table_with_joins, &mut shape)?;
    }

    if let Some(selection) = &select.selection {
        collect_comparisons(selection, &mut shape.predicates)?;
    }

    Ok(shape)
}

fn collect_tables(
    table_with_joins: &TableWithJoins,
    shape: &mut RelationalQueryShape,
) -> Result<(), RewriteError> {
    collect_relation(&table_with_joins.relation, shape)?;
    for join in &table_with_joins.joins {
        collect_relation(&join.relation, shape)?;
    }
    Ok(())
}

fn collect_relation(relation: &TableFactor, shape: &mut RelationalQueryShape) -> Result<(), RewriteError> {
    match relation {
        TableFactor::Table { name, alias, .. } => {
            let table = object_name_key(&name.0);
            if let Some(alias) = alias {
                shape.aliases.insert(alias.name.value.clone(), table.clone());
            }
            shape.tables.insert(table);
            Ok(())
        }
        TableFactor::NestedJoin {
            table_with_joins, ..
        } => collect_tables(table_with_joins, shape),
        TableFactor::Derived { .. } => Err(SqlShapeDefect::NestedSubquery.into()),
        other => Err(SqlShapeDefect::UnsupportedRelation(other.to_string()).into()),
    }
}

/// `a.b.c` for a dotted name, without quoting.
pub fn object_name_key(idents: &[sqlparser::ast::Ident]) -> String {
    idents
        .iter()
        .map(|ident| ident.value.as_str())
        .collect::<Vec<_>>()
        .join(".")
}

fn collect_comparisons(expr: &Expr, out: &mut Vec<Comparison>) -> Result<(), RewriteError> {
    match expr {
        Expr::BinaryOp {
            left,
            op: BinaryOperator::And,
            right,
        } => {
            collect_comparisons(left, out)?;
            collect_comparisons(right, out)
        }
        // Left by an earlier rewrite; carries no column-literal comparison
        Expr::Nested(inner)
            if matches!(inner.as_ref(), Expr::BinaryOp { op: BinaryOperator::Or, .. })
                && partition_disjunction_column(inner).is_some() =>
        {
            Ok(())
        }
        Expr::Nested(inner) => collect_comparisons(inner, out),
        Expr::BinaryOp { left, op, right } => match ComparisonOp::from_binary(op) {
            Some(op) => {
                out.push(normalize(left, op, right)?);
                Ok(())
            }
            None => Err(unsupported(expr)),
        },
        _ => Err(unsupported(expr)),
    }
}

/// Column of a `c = 0 OR c = 1 ...` disjunction over integer partition numbers.
fn partition_disjunction_column(expr: &Expr) -> Option<ColumnRef> {
    match expr {
        Expr::BinaryOp {
            left,
            op: BinaryOperator::Or,
            right,
        } => {
            let column = partition_disjunction_column(left)?;
            (partition_disjunction_column(right)? == column).then_some(column)
        }
        Expr::BinaryOp {
            left,
            op: BinaryOperator::Eq,
            right,
        } => match literal(right) {
            Ok(Literal::Integer(_)) => column_ref(left),
            _ => None,
        },
        _ => None,
    }
}

fn unsupported(expr: &Expr) -> RewriteError {
    SqlShapeDefect::UnsupportedExpression(expr.to_string()).into()
}

/// Puts the column on the left, mirroring the operator when the source has
/// `literal <op> column`.
fn normalize(left: &Expr, op: ComparisonOp, right: &Expr) -> Result<Comparison, RewriteError> {
    if let Some(column) = column_ref(left) {
        return Ok(Comparison {
            left: column,
            op,
            right: literal(right)?,
        });
    }
    if let Some(column) = column_ref(right) {
        return Ok(Comparison {
            left: column,
            op: op.mirrored(),
            right: literal(left)?,
        });
    }
    Err(SqlShapeDefect::UnsupportedExpression(format!("{} {} {}", left, op, right)).into())
}

fn column_ref(expr: &Expr) -> Option<ColumnRef> {
    match expr {
        Expr::Identifier(ident) => Some(ColumnRef {
            qualifier: None,
            column: ident.value.clone(),
        }),
        Expr::CompoundIdentifier(idents) => {
            let (column, qualifier) = idents.split_last()?;
            Some(ColumnRef {
                qualifier: (!qualifier.is_empty()).then(|| object_name_key(qualifier)),
                column: column.value.clone(),
            })
        }
        Expr::Nested(inner) => column_ref(inner),
        _ => None,
    }
}

fn literal(expr: &Expr) -> Result<Literal, RewriteError> {
    match expr {
        Expr::Value(Value::Number(text, _)) => number(text, expr),
        Expr::Value(Value::SingleQuotedString(text))
        | Expr::Value(Value::DoubleQuotedString(text)) => Ok(Literal::String(text.clone())),
        Expr::Value(value @ (Value::Boolean(_) | Value::Null)) => {
            Ok(Literal::Identifier(value.to_string()))
        }
        Expr::UnaryOp {
            op: UnaryOperator::Minus,
            expr: inner,
        } => match literal(inner)? {
            Literal::Integer(value) => Ok(Literal::Integer(-value)),
            Literal::Float(value) => Ok(Literal::Float(-value)),
            _ => Err(unsupported(expr)),
        },
        Expr::UnaryOp {
            op: UnaryOperator::Plus,
            expr: inner,
        } => literal(inner),
        Expr::Nested(inner) => literal(inner),
        Expr::Identifier(_) | Expr::CompoundIdentifier(_) => {
            Ok(Literal::Identifier(expr.to_string()))
        }
        _ => Err(unsupported(expr)),
    }
}

fn number(text: &str, expr: &Expr) -> Result<Literal, RewriteError> {
    if let Ok(value) = text.parse::<i64>() {
        return Ok(Literal::Integer(value));
    }
    text.parse::<f64>()
        .map(Literal::Float)
        .map_err(|_| unsupported(expr))
}
