use serde::Serialize;

use crate::query_planner::{
    types::{Binding, JoinCondition},
    QueryPlan,
};

pub mod errors;
mod to_sql;

use errors::RenderBuildError;

pub trait ToSql {
    fn to_sql(&self) -> String;
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct RenderPlan {
    pub select: SelectItems,
    pub from: FromTableItem,
    pub joins: JoinItems,
    pub filters: FilterItems,
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct SelectItems {
    pub items: Vec<SelectItem>,
    pub distinct: bool,
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct SelectItem {
    pub column: Binding,
    /// SPARQL variable this column answers
    pub variable: String,
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct FromTableItem {
    pub table_name: String,
    pub table_alias: String,
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct JoinItems(pub Vec<Join>);

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Join {
    pub table_name: String,
    pub table_alias: String,
    /// Conjoined in order; the first one is the join on the anchoring variable
    pub joining_on: Vec<JoinCondition>,
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub enum Filter {
    /// Self-join equality inside the anchor table
    ColumnEquality(JoinCondition),
    Constant { column: Binding, literal: String },
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct FilterItems(pub Vec<Filter>);

/// Convert a QueryPlan to a RenderPlan
pub fn query_plan_to_render_plan(plan: QueryPlan) -> Result<RenderPlan, RenderBuildError> {
    if plan.projection.is_empty() {
        return Err(RenderBuildError::MissingSelectItems);
    }

    let mut entries = plan.join_plan.entries.into_iter();
    let root = entries.next().ok_or(RenderBuildError::MissingFromTable)?;

    let joins = entries
        .map(|entry| {
            let anchor = entry
                .join_condition
                .ok_or_else(|| RenderBuildError::MissingJoinCondition(entry.alias()))?;
            let mut joining_on = vec![anchor];
            joining_on.extend(entry.extra_conditions.iter().copied());
            Ok(Join {
                table_alias: entry.alias(),
                table_name: entry.table_name,
                joining_on,
            })
        })
        .collect::<Result<Vec<Join>, RenderBuildError>>()?;

    let filters = root
        .extra_conditions
        .iter()
        .copied()
        .map(Filter::ColumnEquality)
        .chain(
            plan.join_plan
                .predicates
                .into_iter()
                .map(|predicate| Filter::Constant {
                    column: predicate.binding,
                    literal: predicate.literal,
                }),
        )
        .collect();

    Ok(RenderPlan {
        select: SelectItems {
            items: plan
                .projection
                .into_iter()
                .map(|item| SelectItem {
                    column: item.binding,
                    variable: item.variable,
                })
                .collect(),
            distinct: plan.distinct,
        },
        from: FromTableItem {
            table_alias: root.alias(),
            table_name: root.table_name,
        },
        joins: JoinItems(joins),
        filters: FilterItems(filters),
    })
}
