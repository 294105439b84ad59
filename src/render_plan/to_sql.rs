use super::{Filter, FilterItems, FromTableItem, Join, JoinItems, RenderPlan, SelectItems, ToSql};

/// `select ... from T t1[ join T tN on ...]*[ where ...]`
impl ToSql for RenderPlan {
    fn to_sql(&self) -> String {
        let mut sql = self.select.to_sql();
        sql.push_str(&self.from.to_sql());
        sql.push_str(&self.joins.to_sql());
        sql.push_str(&self.filters.to_sql());
        sql
    }
}

impl ToSql for SelectItems {
    fn to_sql(&self) -> String {
        let columns = self
            .items
            .iter()
            .map(|item| item.column.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        if self.distinct {
            format!("select distinct {}", columns)
        } else {
            format!("select {}", columns)
        }
    }
}

impl ToSql for FromTableItem {
    fn to_sql(&self) -> String {
        format!(" from {} {}", self.table_name, self.table_alias)
    }
}

impl ToSql for Join {
    fn to_sql(&self) -> String {
        let conditions = self
            .joining_on
            .iter()
            .map(|condition| condition.to_string())
            .collect::<Vec<_>>()
            .join(" and ");
        format!(" join {} {} on {}", self.table_name, self.table_alias, conditions)
    }
}

impl ToSql for JoinItems {
    fn to_sql(&self) -> String {
        self.0.iter().map(|join| join.to_sql()).collect()
    }
}

impl ToSql for Filter {
    fn to_sql(&self) -> String {
        match self {
            Filter::ColumnEquality(condition) => condition.to_string(),
            Filter::Constant { column, literal } => {
                format!("{} = '{}'", column, literal.replace('\'', "''"))
            }
        }
    }
}

impl ToSql for FilterItems {
    fn to_sql(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }
        let conditions = self
            .0
            .iter()
            .map(|filter| filter.to_sql())
            .collect::<Vec<_>>()
            .join(" and ");
        format!(" where {}", conditions)
    }
}
