//! Unit tests for SPARQL parsing edge cases and error handling
//!
//! Tests malformed queries, unsupported constructs and comment handling to
//! ensure robust parsing without panics.

#[cfg(test)]
mod parser_robustness_tests {
    use sparql2sql::sparql_parser::ast::{PatternElement, Projection, TermPattern};
    use sparql2sql::sparql_parser::{parse_query, strip_comments};

    /// Malformed queries return errors instead of panicking
    #[test]
    fn test_malformed_queries_are_rejected() {
        let malformed_queries = vec![
            "",                                     // Empty query
            "SELECT",                               // Incomplete SELECT
            "SELECT ?x",                            // Missing graph pattern
            "SELECT ?x WHERE",                      // Missing graph pattern
            "SELECT ?x WHERE {",                    // Unclosed group
            "SELECT ?x WHERE { ?x <p#q> }",         // Missing object
            "SELECT ?x WHERE { ?x }",               // Missing predicate
            "SELECT WHERE { ?x <p#q> ?y }",         // Empty projection
            "SELECT ?x WHERE { ?x <p#q> ?y } }",    // Trailing tokens
            "SELECT ?x WHERE { \"lit\" <p#q> ?y }", // Literal subject
            "PREFIX ex <http://ex.org/> SELECT ?x WHERE { ?x ex:p ?y }", // Missing colon
            "ASK { ?x <p#q> ?y }",                  // Not a SELECT
        ];

        for query in malformed_queries {
            assert!(parse_query(query).is_err(), "Expected error for: {}", query);
        }
    }

    #[test]
    fn test_unsupported_constructs_are_named() {
        let cases = vec![
            ("SELECT ?x WHERE { ?x <p#q> ?y OPTIONAL { ?y <p#r> ?z } }", "OPTIONAL"),
            ("SELECT ?x WHERE { ?x <p#q> ?y . FILTER (?y > 3) }", "FILTER"),
            ("SELECT ?x WHERE { { ?x <p#q> ?y } UNION { ?x <p#r> ?y } }", "UNION"),
            ("SELECT ?x WHERE { ?x <p#q> ?y . VALUES ?y { 1 2 } }", "VALUES"),
        ];

        for (query, construct) in cases {
            let message = parse_query(query).unwrap_err().to_string();
            assert!(
                message.contains(construct),
                "Expected '{}' in error for {}: {}",
                construct,
                query,
                message
            );
        }
    }

    /// Comment stripping leaves IRIs and string literals alone
    #[test]
    fn test_comment_stripping_edge_cases() {
        let test_cases = vec![
            ("", ""),
            ("SELECT ?x", "SELECT ?x"),
            ("SELECT ?x # trailing", "SELECT ?x"),
            ("# header\nSELECT ?x", "SELECT ?x"),
            ("?x <http://ex.org/ns#type> ?y", "?x <http://ex.org/ns#type> ?y"),
            ("?x <p> \"a # b\" # gone", "?x <p> \"a # b\""),
            ("?x <p> 'it#s'", "?x <p> 'it#s'"),
        ];

        for (input, expected) in test_cases {
            assert_eq!(strip_comments(input), expected, "Failed for input: {}", input);
        }
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let query =
            parse_query("select distinct ?x where { ?x a <http://ex.org/ns#C> }").unwrap();
        assert_eq!(query.projection, Projection::Variables(vec!["x"]));
        assert_eq!(query.pattern.all_triples().len(), 1);
    }

    #[test]
    fn test_a_abbreviates_rdf_type() {
        let query = parse_query("SELECT ?x WHERE { ?x a <http://ex.org/ns#C> }").unwrap();
        let triples = query.pattern.all_triples();
        assert_eq!(triples[0].predicate, TermPattern::RdfType);
        assert_eq!(triples[0].object, TermPattern::Iri("http://ex.org/ns#C"));
    }

    #[test]
    fn test_predicate_object_lists_expand_in_order() {
        let query = parse_query(
            "PREFIX ub: <http://ex.org/ub#>
             SELECT ?x WHERE { ?x ub:name ?n ; ub:email ?e , ?f . }",
        )
        .unwrap();

        let predicates: Vec<_> = query
            .pattern
            .all_triples()
            .into_iter()
            .map(|triple| triple.predicate.clone())
            .collect();
        assert_eq!(
            predicates,
            vec![
                TermPattern::PrefixedName { prefix: "ub", local: "name" },
                TermPattern::PrefixedName { prefix: "ub", local: "email" },
                TermPattern::PrefixedName { prefix: "ub", local: "email" },
            ]
        );
    }

    #[test]
    fn test_nested_and_minus_groups_are_kept() {
        let query = parse_query(
            "SELECT ?x WHERE { ?x <p#q> ?y . { ?y <p#r> ?z } MINUS { ?x <p#s> ?z } }",
        )
        .unwrap();

        assert!(matches!(query.pattern.elements[0], PatternElement::Triples(_)));
        assert!(matches!(query.pattern.elements[1], PatternElement::Group(_)));
        assert!(matches!(query.pattern.elements[2], PatternElement::Minus(_)));
    }

    #[test]
    fn test_deeply_nested_groups_parse() {
        let depth = 32;
        let query = format!(
            "SELECT ?x WHERE {}?x <p#q> ?y{}",
            "{ ".repeat(depth),
            " }".repeat(depth)
        );
        assert!(parse_query(&query).is_ok());
    }
}
