//! Partition-aware SQL rewriting against in-memory and YAML metadata

use std::io::Write;

use sparql2sql::metadata_store::{InMemoryMetadataStore, YamlMetadataStore};
use sparql2sql::sql_rewriter::{SqlShapeDefect, MAX_PARTITIONS};
use sparql2sql::{PartitionRewriter, RewriteError};

fn store() -> InMemoryMetadataStore {
    InMemoryMetadataStore::new()
        .with_mapping("tbl", 1, "tbl2")
        .with_attribute(1, "fid", "fid", 20000)
}

fn rewrite(sql: &str) -> String {
    let store = store();
    match PartitionRewriter::new(&store).rewrite(sql) {
        Ok(outcome) => outcome.sql,
        Err(e) => panic!("Rewrite failed for {}: {}", sql, e),
    }
}

#[test]
fn test_less_than_expands_to_partition_disjunction() {
    assert_eq!(
        rewrite("select tbl.fid from tbl where tbl.fid < 100000"),
        "SELECT tbl2.fid FROM tbl2 WHERE tbl2.fid < 100000 AND \
         (tbl2.fid = 0 OR tbl2.fid = 1 OR tbl2.fid = 2 OR tbl2.fid = 3 OR tbl2.fid = 4)"
    );
}

#[test]
fn test_less_or_equal_includes_boundary_partition() {
    assert_eq!(
        rewrite("select * from tbl where tbl.fid <= 40000"),
        "SELECT * FROM tbl2 WHERE tbl2.fid <= 40000 AND \
         (tbl2.fid = 0 OR tbl2.fid = 1 OR tbl2.fid = 2)"
    );
}

#[test]
fn test_equality_selects_single_partition() {
    assert_eq!(
        rewrite("select fid from tbl where fid = 45000"),
        "SELECT fid FROM tbl2 WHERE fid = 45000 AND (tbl2.fid = 2)"
    );
}

#[test]
fn test_empty_range_adds_no_constraint() {
    let store = store();
    let outcome = PartitionRewriter::new(&store)
        .rewrite("select * from tbl where tbl.fid < 10000")
        .unwrap();

    assert_eq!(outcome.sql, "SELECT * FROM tbl2 WHERE tbl2.fid < 10000");
    assert!(outcome.constraints.is_empty());
    assert_eq!(outcome.substitutions.len(), 1);
}

#[test]
fn test_rewrite_is_idempotent() {
    let store = store();
    let rewriter = PartitionRewriter::new(&store);

    let first = rewriter
        .rewrite("select tbl.fid from tbl where tbl.fid < 100000")
        .unwrap();
    let second = rewriter.rewrite(&first.sql).unwrap();

    assert_eq!(second.sql, first.sql);
    assert!(second.substitutions.is_empty());
    assert!(second.constraints.is_empty());
}

#[test]
fn test_alias_is_kept_and_qualifies_constraint() {
    let store = InMemoryMetadataStore::new()
        .with_mapping("lineitem", 7, "lineitem_part")
        .with_attribute(7, "l_orderkey", "l_orderkey_bucket", 1000);

    let outcome = PartitionRewriter::new(&store)
        .rewrite("select l.l_orderkey from lineitem l where l.l_orderkey = 2500")
        .unwrap();

    assert_eq!(
        outcome.sql,
        "SELECT l.l_orderkey FROM lineitem_part AS l WHERE l.l_orderkey = 2500 \
         AND (l.l_orderkey_bucket = 2)"
    );
    assert_eq!(outcome.substitutions[0].target_table, "lineitem_part");
}

#[test]
fn test_unsupported_predicates_are_skipped_and_reported() {
    let store = store();
    let outcome = PartitionRewriter::new(&store)
        .rewrite("select * from tbl where tbl.fid > 5 and tbl.fid = 'abc'")
        .unwrap();

    assert_eq!(outcome.sql, "SELECT * FROM tbl2 WHERE tbl2.fid > 5 AND tbl2.fid = 'abc'");
    assert_eq!(outcome.skipped.len(), 2);
    assert!(matches!(
        outcome.skipped[0].reason,
        RewriteError::UnsupportedOperator { .. }
    ));
    assert!(matches!(
        outcome.skipped[1].reason,
        RewriteError::UnsupportedLiteralType { .. }
    ));
}

#[test]
fn test_unbounded_range_is_skipped() {
    let store = InMemoryMetadataStore::new()
        .with_mapping("tbl", 1, "tbl2")
        .with_attribute(1, "fid", "fid", 1);

    let outcome = PartitionRewriter::new(&store)
        .rewrite("select * from tbl where tbl.fid <= 9223372036854775807 and tbl.fid = 7")
        .unwrap();

    assert_eq!(
        outcome.sql,
        "SELECT * FROM tbl2 WHERE tbl2.fid <= 9223372036854775807 AND tbl2.fid = 7 AND (tbl2.fid = 7)"
    );
    assert_eq!(outcome.skipped.len(), 1);
    assert!(matches!(
        outcome.skipped[0].reason,
        RewriteError::PartitionRangeTooLarge { limit: MAX_PARTITIONS, .. }
    ));
}

#[test]
fn test_widest_range_rewrites_and_walks_again() {
    let store = InMemoryMetadataStore::new()
        .with_mapping("tbl", 1, "tbl2")
        .with_attribute(1, "fid", "fid", 1);
    let rewriter = PartitionRewriter::new(&store);

    let sql = format!("select * from tbl where tbl.fid < {}", MAX_PARTITIONS);
    let first = rewriter.rewrite(&sql).unwrap();
    assert_eq!(first.constraints[0].partitions.len() as i64, MAX_PARTITIONS);
    assert!(first.sql.ends_with(&format!("OR tbl2.fid = {})", MAX_PARTITIONS - 1)));

    let second = rewriter.rewrite(&first.sql).unwrap();
    assert_eq!(second.sql, first.sql);
}

#[test]
fn test_unpartitioned_columns_are_left_alone() {
    assert_eq!(
        rewrite("select * from tbl where tbl.name = 'x' and tbl.fid = 0"),
        "SELECT * FROM tbl2 WHERE tbl2.name = 'x' AND tbl2.fid = 0 AND (tbl2.fid = 0)"
    );
}

#[test]
fn test_query_without_partitioned_table_is_rejected() {
    let store = store();
    let result = PartitionRewriter::new(&store).rewrite("select * from other where other.fid = 1");
    assert!(matches!(result, Err(RewriteError::NoPartitionedTable)));
}

#[test]
fn test_nested_subquery_is_rejected() {
    let store = store();
    let result = PartitionRewriter::new(&store)
        .rewrite("select * from tbl where tbl.fid in (select id from other)");
    assert!(matches!(
        result,
        Err(RewriteError::MalformedSqlShape(SqlShapeDefect::NestedSubquery))
    ));
}

#[test]
fn test_yaml_store_sees_fresh_snapshot_per_call() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "tables:\n  - {{ origin: tbl, id: 1, target: tbl2 }}\n\
         partitions:\n  - {{ table_id: 1, origin: fid, target: fid, floor: 20000 }}\n"
    )
    .unwrap();

    let store = YamlMetadataStore::new(file.path());
    let rewriter = PartitionRewriter::new(&store);
    let sql = "select * from tbl where tbl.fid = 50000";

    assert_eq!(
        rewriter.rewrite(sql).unwrap().sql,
        "SELECT * FROM tbl2 WHERE tbl2.fid = 50000 AND (tbl2.fid = 2)"
    );

    std::fs::write(
        file.path(),
        "tables:\n  - { origin: tbl, id: 1, target: tbl3 }\n\
         partitions:\n  - { table_id: 1, origin: fid, target: fid, floor: 10000 }\n",
    )
    .unwrap();

    assert_eq!(
        rewriter.rewrite(sql).unwrap().sql,
        "SELECT * FROM tbl3 WHERE tbl3.fid = 50000 AND (tbl3.fid = 5)"
    );
}

#[test]
fn test_missing_yaml_file_is_a_metadata_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = YamlMetadataStore::new(dir.path().join("missing.yaml"));
    let result = PartitionRewriter::new(&store).rewrite("select * from tbl where tbl.fid = 1");
    assert!(matches!(result, Err(RewriteError::Metadata(_))));
}
