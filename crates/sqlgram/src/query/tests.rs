//! Builder tests: what each method records, before any grammar is involved.

use super::*;
use crate::raw::raw;

#[test]
fn test_table_sets_source() {
    let q = table("users");
    assert_eq!(q.table_name(), Some("users"));
    assert_eq!(q.source(), Some(&Source::Table("users".into())));

    let q = Query::new().from_raw("generate_series(1, 3)");
    assert_eq!(q.table_name(), None);
}

#[test]
fn test_limit_clamping() {
    assert_eq!(table("t").limit(10).limit_value(), Some(10));
    assert_eq!(table("t").limit(0).limit_value(), None);
    assert_eq!(table("t").limit(-3).limit_value(), None);
    assert_eq!(table("t").limit(10).limit(0).limit_value(), None);
}

#[test]
fn test_offset_clamping() {
    assert_eq!(table("t").offset(5).offset_value(), Some(5));
    assert_eq!(table("t").offset(-5).offset_value(), Some(0));
    assert_eq!(table("t").skip(0).offset_value(), Some(0));
}

#[test]
fn test_for_page() {
    let q = table("t").for_page(3, 20);
    assert_eq!(q.limit_value(), Some(20));
    assert_eq!(q.offset_value(), Some(40));

    let q = table("t").for_page(1, 20);
    assert_eq!(q.offset_value(), Some(0));

    let q = table("t").for_page(-2, 15);
    assert_eq!(q.limit_value(), Some(15));
    assert_eq!(q.offset_value(), Some(0));
}

#[test]
fn test_null_shorthand() {
    let q = table("t").eq("a", Value::Null).ne("b", Value::Null).filter("c", "<>", None::<i64>);
    let kinds: Vec<_> = q.wheres().iter().map(|p| &p.kind).collect();
    assert_eq!(
        kinds,
        vec![
            &PredicateKind::Null { column: "a".into(), negated: false },
            &PredicateKind::Null { column: "b".into(), negated: true },
            &PredicateKind::Null { column: "c".into(), negated: true },
        ]
    );
}

#[test]
fn test_null_with_other_operator_stays_basic() {
    let q = table("t").filter("a", ">", Value::Null);
    assert!(matches!(
        q.wheres()[0].kind,
        PredicateKind::Basic { operand: Operand::Value(Value::Null), .. }
    ));
}

#[test]
fn test_connectors() {
    let q = table("t").eq("a", 1).or_eq("b", 2).gt("c", 3);
    let booleans: Vec<_> = q.wheres().iter().map(|p| p.boolean).collect();
    assert_eq!(booleans, vec![Boolean::And, Boolean::Or, Boolean::And]);
}

#[test]
fn test_nested_group() {
    let q = table("t").eq("a", 1).or_nested(|c| c.eq("b", 2).eq("c", 3));
    assert_eq!(q.wheres().len(), 2);
    let group = &q.wheres()[1];
    assert_eq!(group.boolean, Boolean::Or);
    match &group.kind {
        PredicateKind::Nested(inner) => assert_eq!(inner.len(), 2),
        other => panic!("expected nested group, got {other:?}"),
    }
}

#[test]
fn test_empty_nested_group_is_dropped() {
    let q = table("t").nested(|c| c).or_nested(|c| c);
    assert!(q.wheres().is_empty());
}

#[test]
fn test_dynamic_where() {
    let q = table("t").dynamic_where(&[("a", Boolean::And), ("b", Boolean::Or)], [1, 2]);
    assert_eq!(q.wheres().len(), 2);
    assert_eq!(q.wheres()[1].boolean, Boolean::Or);
    assert!(q.build_error.is_none());
}

#[test]
fn test_dynamic_where_mismatch_records_error() {
    let q = table("t").dynamic_where(&[("a", Boolean::And)], [1, 2]);
    assert!(q.wheres().is_empty());
    assert_eq!(
        q.build_error.as_deref(),
        Some("dynamic where expects 1 values, got 2")
    );

    // only the first error is kept
    let q = q.dynamic_where(&[("a", Boolean::And), ("b", Boolean::And)], [1]);
    assert_eq!(
        q.build_error.as_deref(),
        Some("dynamic where expects 1 values, got 2")
    );
}

#[test]
fn test_join_conditions() {
    let q = table("users").join_with(JoinKind::Left, "photos", |j| {
        j.on("users.id", "=", "photos.user_id").eq("photos.public", true)
    });
    let join = &q.joins()[0];
    assert_eq!(join.kind, JoinKind::Left);
    assert_eq!(join.table, "photos");
    assert_eq!(join.conditions.len(), 2);
    assert!(matches!(join.conditions[0].kind, PredicateKind::Column { .. }));
    assert!(matches!(join.conditions[1].kind, PredicateKind::Basic { .. }));
}

#[test]
fn test_cross_join_has_no_conditions() {
    let q = table("sizes").cross_join("colors");
    assert_eq!(q.joins()[0].kind, JoinKind::Cross);
    assert!(q.joins()[0].conditions.is_empty());
}

#[test]
fn test_cross_join_predicates_record_error() {
    let q = table("sizes").join_with(JoinKind::Cross, "colors", |j| {
        j.on("sizes.id", "=", "colors.size_id")
    });
    assert!(q.joins().is_empty());
    assert_eq!(
        q.build_error.as_deref(),
        Some("cross join to colors cannot carry predicates")
    );
}

#[test]
fn test_raw_operands() {
    let q = table("t")
        .filter_raw("a", "=", "now()")
        .where_raw_compare("lower(name)", "=", Value::from("bob"))
        .where_raw_compare("count(*)", ">", raw("1"));
    assert!(matches!(
        q.wheres()[0].kind,
        PredicateKind::Basic { operand: Operand::Raw(_), .. }
    ));
    assert!(matches!(
        q.wheres()[1].kind,
        PredicateKind::RawCompare { operand: Operand::Value(_), .. }
    ));
    assert!(matches!(
        q.wheres()[2].kind,
        PredicateKind::RawCompare { operand: Operand::Raw(_), .. }
    ));
}

#[test]
fn test_select_list() {
    let q = table("t")
        .select(&["a", "b"])
        .add_select("c")
        .select_raw("count(*) as n", vec![])
        .select_sub(table("u").select(&["x"]), "sub");
    assert_eq!(q.columns.len(), 5);
    assert_eq!(q.columns[2], Column::Name("c".into()));
    assert!(matches!(q.columns[4], Column::Sub { ref alias, .. } if alias == "sub"));
}

#[test]
fn test_aggregate_is_removable() {
    let q = table("t").eq("a", 1).aggregate(AggregateFn::Count, "*");
    assert!(q.aggregate.is_some());
    let plain = q.without_aggregate();
    assert!(plain.aggregate.is_none());
    assert_eq!(plain.wheres(), q.wheres());
}

#[test]
fn test_locks_and_unions() {
    let q = table("t").shared_lock().lock_for_update();
    assert_eq!(q.lock, Some(Lock::Exclusive));

    let q = table("a").union(table("b")).union_all(table("c"));
    assert_eq!(q.unions.len(), 2);
    assert!(!q.unions[0].all);
    assert!(q.unions[1].all);
}

#[test]
fn test_row_from_iter_keeps_order() {
    let row: Row = vec![("email", "a@b.c"), ("name", "bob")].into_iter().collect();
    assert_eq!(row.columns().collect::<Vec<_>>(), vec!["email", "name"]);
    assert_eq!(row.len(), 2);

    let other = Row::new().set("email", "x").set_raw("name", "upper('y')");
    assert!(row.same_columns(&other));
    assert!(!row.same_columns(&Row::new().set("name", "bob").set("email", "x")));
}
