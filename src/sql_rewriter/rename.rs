use std::collections::BTreeMap;
use std::ops::ControlFlow;

use sqlparser::ast::{
    visit_expressions_mut, visit_relations_mut, Expr, Ident, ObjectName, SelectItem, SetExpr,
    Statement,
};

use super::ast_walker::object_name_key;

/// Renames table references in place. Relations whose full name is a key of
/// `renames` get the target name; column qualifiers naming such a table are
/// renamed too, unless the qualifier is one of `aliases`.
pub fn rename_tables(
    statement: &mut Statement,
    renames: &BTreeMap<String, String>,
    aliases: &BTreeMap<String, String>,
) {
    let _ = visit_relations_mut(statement, |name: &mut ObjectName| {
        if let Some(target) = renames.get(&object_name_key(&name.0)) {
            *name = object_name(target);
        }
        ControlFlow::<()>::Continue(())
    });

    let _ = visit_expressions_mut(statement, |expr: &mut Expr| {
        if let Expr::CompoundIdentifier(idents) = expr {
            rename_qualifier(idents, renames, aliases);
        }
        ControlFlow::<()>::Continue(())
    });

    // `tbl.*` is not an expression, so the visitor above never sees it
    if let Statement::Query(query) = statement {
        if let SetExpr::Select(select) = query.body.as_mut() {
            for item in select.projection.iter_mut() {
                if let SelectItem::QualifiedWildcard(name, _) = item {
                    let qualifier = object_name_key(&name.0);
                    if !aliases.contains_key(&qualifier) {
                        if let Some(target) = renames.get(&qualifier) {
                            *name = object_name(target);
                        }
                    }
                }
            }
        }
    }
}

fn object_name(dotted: &str) -> ObjectName {
    ObjectName(dotted.split('.').map(Ident::new).collect())
}

fn rename_qualifier(
    idents: &mut Vec<Ident>,
    renames: &BTreeMap<String, String>,
    aliases: &BTreeMap<String, String>,
) {
    let Some((_, qualifier)) = idents.split_last() else {
        return;
    };
    if qualifier.is_empty() {
        return;
    }

    let key = object_name_key(qualifier);
    if aliases.contains_key(&key) {
        return;
    }
    if let Some(target) = renames.get(&key) {
        let column = idents.pop();
        *idents = object_name(target).0;
        idents.extend(column);
    }
}
