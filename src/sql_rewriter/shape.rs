use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;
use sqlparser::ast::BinaryOperator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComparisonOp {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
    Ne,
}

impl ComparisonOp {
    pub fn from_binary(op: &BinaryOperator) -> Option<Self> {
        match op {
            BinaryOperator::Eq => Some(ComparisonOp::Eq),
            BinaryOperator::Lt => Some(ComparisonOp::Lt),
            BinaryOperator::LtEq => Some(ComparisonOp::Le),
            BinaryOperator::Gt => Some(ComparisonOp::Gt),
            BinaryOperator::GtEq => Some(ComparisonOp::Ge),
            BinaryOperator::NotEq => Some(ComparisonOp::Ne),
            _ => None,
        }
    }

    /// Operator to use once the operands are swapped: `5 < x` is `x > 5`.
    pub fn mirrored(self) -> Self {
        match self {
            ComparisonOp::Lt => ComparisonOp::Gt,
            ComparisonOp::Gt => ComparisonOp::Lt,
            ComparisonOp::Le => ComparisonOp::Ge,
            ComparisonOp::Ge => ComparisonOp::Le,
            symmetric => symmetric,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Ne => "<>",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnRef {
    /// Table name or alias, dotted when schema-qualified
    pub qualifier: Option<String>,
    pub column: String,
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{}.{}", qualifier, self.column),
            None => f.write_str(&self.column),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(String),
    /// A column, boolean or NULL on the right-hand side
    Identifier(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(value) => write!(f, "{}", value),
            Literal::Float(value) => write!(f, "{}", value),
            Literal::String(value) => write!(f, "'{}'", value.replace('\'', "''")),
            Literal::Identifier(value) => f.write_str(value),
        }
    }
}

/// `column <op> literal`; a source `literal <op> column` is stored mirrored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub left: ColumnRef,
    pub op: ComparisonOp,
    pub right: Literal,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op, self.right)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RelationalQueryShape {
    /// Projection items as written, in source order
    pub projection: Vec<String>,
    pub tables: BTreeSet<String>,
    /// alias -> table name
    pub aliases: BTreeMap<String, String>,
    pub predicates: Vec<Comparison>,
}

impl RelationalQueryShape {
    /// Table a column belongs to: the table named or aliased by its qualifier,
    /// or the only table of the query for an unqualified column.
    pub fn owning_table(&self, column: &ColumnRef) -> Option<&str> {
        match &column.qualifier {
            Some(qualifier) => self
                .aliases
                .get(qualifier)
                .map(String::as_str)
                .or_else(|| self.tables.get(qualifier).map(String::as_str)),
            None if self.tables.len() == 1 => self.tables.iter().next().map(String::as_str),
            None => None,
        }
    }

    /// Alias `column` reaches its table through, if any.
    pub fn alias_for(&self, column: &ColumnRef, table: &str) -> Option<&str> {
        match &column.qualifier {
            Some(qualifier) => self
                .aliases
                .get_key_value(qualifier)
                .map(|(alias, _)| alias.as_str()),
            None => {
                let mut aliases = self
                    .aliases
                    .iter()
                    .filter(|(_, aliased)| aliased.as_str() == table);
                match (aliases.next(), aliases.next()) {
                    (Some((alias, _)), None) => Some(alias.as_str()),
                    _ => None,
                }
            }
        }
    }

    pub fn is_alias(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(qualifier: Option<&str>, name: &str) -> ColumnRef {
        ColumnRef {
            qualifier: qualifier.map(str::to_string),
            column: name.to_string(),
        }
    }

    fn shape_of(tables: &[&str], aliases: &[(&str, &str)]) -> RelationalQueryShape {
        RelationalQueryShape {
            tables: tables.iter().map(|t| t.to_string()).collect(),
            aliases: aliases
                .iter()
                .map(|(a, t)| (a.to_string(), t.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_mirrored_operators() {
        assert_eq!(ComparisonOp::Lt.mirrored(), ComparisonOp::Gt);
        assert_eq!(ComparisonOp::Ge.mirrored(), ComparisonOp::Le);
        assert_eq!(ComparisonOp::Eq.mirrored(), ComparisonOp::Eq);
        assert_eq!(ComparisonOp::Ne.mirrored(), ComparisonOp::Ne);
    }

    #[test]
    fn test_owning_table() {
        let shape = shape_of(&["orders", "lineitem"], &[("l", "lineitem")]);
        assert_eq!(shape.owning_table(&column(Some("l"), "x")), Some("lineitem"));
        assert_eq!(shape.owning_table(&column(Some("orders"), "x")), Some("orders"));
        assert_eq!(shape.owning_table(&column(Some("nope"), "x")), None);
        // Ambiguous without a qualifier
        assert_eq!(shape.owning_table(&column(None, "x")), None);

        let single = shape_of(&["orders"], &[]);
        assert_eq!(single.owning_table(&column(None, "x")), Some("orders"));
    }

    #[test]
    fn test_alias_for_unqualified_column() {
        let shape = shape_of(&["orders"], &[("o", "orders")]);
        assert_eq!(shape.alias_for(&column(None, "x"), "orders"), Some("o"));
        assert_eq!(shape.alias_for(&column(Some("orders"), "x"), "orders"), None);
    }

    #[test]
    fn test_comparison_display() {
        let comparison = Comparison {
            left: column(Some("t"), "name"),
            op: ComparisonOp::Ne,
            right: Literal::String("O'Hara".to_string()),
        };
        assert_eq!(comparison.to_string(), "t.name <> 'O''Hara'");
    }
}
