//! SPARQL to SQL translation through `sparql2sql::translate`

use sparql2sql::query_planner::evaluate_select_query;
use sparql2sql::render_plan::Filter;
use sparql2sql::{translate, PatternDefect, TranslateError};

const UB: &str = "PREFIX ub: <http://swat.cse.lehigh.edu/onto/univ-bench.owl#>\n";

fn sql(query: &str) -> String {
    match translate(query) {
        Ok(translation) => translation.sql,
        Err(e) => panic!("Translation failed for {}: {}", query, e),
    }
}

// Table names are the fragment after the last `#`: `p#type` reads table `type`.
// Some older worked examples show `p_type` here; `type` is intended.
#[test]
fn test_type_pattern_renders_class_name() {
    assert_eq!(
        sql("SELECT ?X WHERE { ?X <http://ex.org/p#type> <http://ex.org/ns#C> }"),
        "select t1.s from type t1 where t1.o = 'C'"
    );
}

#[test]
fn test_chain_pattern_joins_on_shared_variable() {
    let translation = translate(
        "SELECT ?X ?Y WHERE {
            ?X <http://ex.org/ns#advisor> ?Y .
            ?Y <http://ex.org/ns#worksFor> <http://www.Department0.University0.edu/v>
         }",
    )
    .unwrap();

    assert_eq!(
        translation.sql,
        "select t1.s, t1.o from advisor t1 join worksFor t2 on t1.o = t2.s where t2.o = 'v'"
    );
    assert_eq!(translation.plan.joins.0.len(), 1);
    assert_eq!(translation.plan.joins.0[0].joining_on[0].to_string(), "t1.o = t2.s");
    assert_eq!(translation.plan.filters.0.len(), 1);
    assert!(matches!(
        &translation.plan.filters.0[0],
        Filter::Constant { literal, .. } if literal == "v"
    ));
}

#[test]
fn test_prefixed_names_and_a_keyword() {
    let query = format!(
        "{}SELECT ?X ?Y WHERE {{ ?X a ub:GraduateStudent . ?X ub:takesCourse ?Y }}",
        UB
    );
    assert_eq!(
        sql(&query),
        "select t1.s, t2.o from type t1 join takesCourse t2 on t1.s = t2.s \
         where t1.o = 'GraduateStudent'"
    );
}

#[test]
fn test_connected_pattern_has_one_entry_per_triple() {
    let query = format!(
        "{}SELECT ?X WHERE {{
            ?X ub:memberOf ?D .
            ?D ub:subOrganizationOf ?U .
            ?S ub:undergraduateDegreeFrom ?U .
            ?S ub:advisor ?X
         }}",
        UB
    );
    let join_plan = evaluate_select_query(&query).unwrap().join_plan;

    assert_eq!(join_plan.entries.len(), 4);
    assert_eq!(join_plan.join_condition_count(), 3);
    assert!(join_plan.entries[0].join_condition.is_none());
}

#[test]
fn test_pattern_order_does_not_need_to_be_connected_left_to_right() {
    // The second triple only connects through the third
    let query = format!(
        "{}SELECT ?X ?N WHERE {{ ?X ub:memberOf ?D . ?P ub:name ?N . ?P ub:worksFor ?D }}",
        UB
    );
    assert_eq!(
        sql(&query),
        "select t1.s, t3.o from memberOf t1 join worksFor t2 on t1.o = t2.o \
         join name t3 on t2.s = t3.s"
    );
}

#[test]
fn test_keyword_named_variable_is_projected() {
    assert_eq!(
        sql("SELECT ?where WHERE { ?where <http://ex.org/ns#p> ?y }"),
        "select t1.s from p t1"
    );
}

#[test]
fn test_disconnected_pattern_fails_fast() {
    let result = translate(
        "SELECT ?X WHERE { ?X <http://ex.org/ns#p> ?Y . ?A <http://ex.org/ns#q> ?B }",
    );
    assert_eq!(
        result,
        Err(TranslateError::MalformedPattern(PatternDefect::Disconnected(1)))
    );
}

#[test]
fn test_unbound_projection_is_reported() {
    let result = translate("SELECT ?X ?Z WHERE { ?X <http://ex.org/ns#p> ?Y }");
    match result {
        Err(TranslateError::UnresolvedProjection(variable)) => assert_eq!(variable, "?Z"),
        other => panic!("Expected unresolved projection, got {:?}", other),
    }
}

#[test]
fn test_variable_predicate_is_rejected() {
    assert_eq!(
        translate("SELECT ?X WHERE { ?X ?P ?Y }"),
        Err(TranslateError::MalformedPattern(PatternDefect::VariablePredicate(0)))
    );
}

#[test]
fn test_anchor_with_two_constants_is_rejected() {
    assert_eq!(
        translate("SELECT ?X WHERE { <http://ex.org/a> <http://ex.org/ns#p> <http://ex.org/b> }"),
        Err(TranslateError::MalformedPattern(PatternDefect::BothTermsConcrete(0)))
    );
}

#[test]
fn test_distinct_and_star() {
    assert_eq!(
        sql("SELECT DISTINCT * WHERE { ?X <http://ex.org/ns#p> ?Y }"),
        "select distinct t1.s, t1.o from p t1"
    );
}

#[test]
fn test_repeated_variable_adds_join_condition() {
    // ?Y is bound by the first triple and reappears in the third
    let query = format!(
        "{}SELECT ?X WHERE {{ ?X ub:advisor ?Y . ?X ub:takesCourse ?C . ?Y ub:teacherOf ?C }}",
        UB
    );
    assert_eq!(
        sql(&query),
        "select t1.s from advisor t1 join takesCourse t2 on t1.s = t2.s \
         join teacherOf t3 on t1.o = t3.s and t2.o = t3.o"
    );
}

#[test]
fn test_string_literal_object() {
    let query = format!("{}SELECT ?X WHERE {{ ?X ub:name \"O'Brien\" }}", UB);
    assert_eq!(
        sql(&query),
        "select t1.s from name t1 where t1.o = 'O''Brien'"
    );
}

#[test]
fn test_parse_errors_are_surfaced() {
    assert!(matches!(
        translate("SELECT ?X WHERE { ?X <p#q> ?Y OPTIONAL { ?Y <p#r> ?Z } }"),
        Err(TranslateError::Parse(_))
    ));
}

#[test]
fn test_render_plan_serializes_to_json() {
    let plan = translate("SELECT ?X WHERE { ?X <http://ex.org/ns#p> ?Y }").unwrap().plan;
    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["from"]["table_name"], "p");
    assert_eq!(json["from"]["table_alias"], "t1");
}
