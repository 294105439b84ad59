//! Unit tests for resolving projected variables against variable bindings

#[cfg(test)]
mod projection_tests {
    use sparql2sql::query_planner::projection::resolve_projection;
    use sparql2sql::query_planner::types::{Binding, Role, VariableBindings};
    use sparql2sql::{PatternDefect, TranslateError};

    fn bindings() -> VariableBindings {
        let mut bindings = VariableBindings::default();
        bindings.bind("X", Binding::new(1, Role::Subject));
        bindings.bind("Y", Binding::new(1, Role::Object));
        bindings.bind("Z", Binding::new(2, Role::Object));
        bindings
    }

    fn columns(query: &str) -> Vec<String> {
        resolve_projection(query, &bindings())
            .unwrap()
            .into_iter()
            .map(|item| format!("{}={}", item.variable, item.binding))
            .collect()
    }

    #[test]
    fn test_projection_follows_written_order() {
        assert_eq!(
            columns("SELECT ?Z ?X WHERE { ... }"),
            vec!["Z=t2.o", "X=t1.s"]
        );
    }

    #[test]
    fn test_commas_sigils_and_modifiers() {
        assert_eq!(
            columns("select distinct $X, ?Y where { ... }"),
            vec!["X=t1.s", "Y=t1.o"]
        );
    }

    #[test]
    fn test_star_projects_in_binding_order() {
        assert_eq!(
            columns("SELECT * WHERE { ... }"),
            vec!["X=t1.s", "Y=t1.o", "Z=t2.o"]
        );
    }

    #[test]
    fn test_keywords_inside_names_are_not_boundaries() {
        let mut bindings = bindings();
        bindings.bind("selected", Binding::new(3, Role::Subject));
        bindings.bind("nowhere", Binding::new(3, Role::Object));

        let items =
            resolve_projection("SELECT ?selected ?nowhere WHERE { ... }", &bindings).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].binding.to_string(), "t3.o");
    }

    #[test]
    fn test_unbound_variable_is_named() {
        assert_eq!(
            resolve_projection("SELECT ?X ?W WHERE { ... }", &bindings()),
            Err(TranslateError::UnresolvedProjection("?W".to_string()))
        );
    }

    #[test]
    fn test_missing_where_keyword() {
        assert_eq!(
            resolve_projection("SELECT ?X { ... }", &bindings()),
            Err(TranslateError::MalformedPattern(
                PatternDefect::MissingSelectWhere
            ))
        );
    }
}
