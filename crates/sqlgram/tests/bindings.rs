//! Placeholder and binding invariants across every dialect and statement kind.

use sqlgram::{
    table, AggregateFn, Dialect, Filter, Grammar, JoinKind, Query, Row, Statement, Value,
};

fn sample_queries() -> Vec<Query> {
    vec![
        table("users"),
        table("users").eq("id", 1).or_eq("email", "a@b.c"),
        table("users")
            .select(&["id", "email"])
            .select_sub(table("orders").select(&["total"]).eq("status", "paid").take(1), "last_total")
            .join_with(JoinKind::Left, "profiles", |j| {
                j.on("users.id", "=", "profiles.user_id").eq("profiles.visible", true)
            })
            .in_list("users.role", ["admin", "owner"])
            .nested(|c| c.between("age", 18, 65).or_is_null("age"))
            .group_by(&["users.id"])
            .having("total", ">", 100)
            .order_by_raw("field(users.id, ?)", vec![Value::Int(7)])
            .for_page(3, 25),
        table("users")
            .in_sub("id", table("bans").select(&["user_id"]).gt("until", "2024-01-01"))
            .exists(table("orders").where_column("orders.user_id", "=", "users.id")),
        table("users")
            .eq("id", 1)
            .union(table("admins").eq("id", 2))
            .union_all(table("owners").eq("id", 3))
            .order_by_desc("id"),
        table("users").where_day("created_at", "=", 4).aggregate(AggregateFn::Count, "*"),
        table("users").eq("id", 1).aggregate(AggregateFn::Exists, "*"),
        table("users").where_raw("email like ? or name like ?", vec!["%a%".into(), "%b%".into()]),
    ]
}

fn assert_consistent(stmt: &Statement) {
    assert_eq!(
        stmt.placeholder_count(),
        stmt.bindings().len(),
        "placeholder mismatch in: {}",
        stmt.sql()
    );
    assert!(!stmt.sql().contains("where and"), "{}", stmt.sql());
    assert!(!stmt.sql().contains("where or"), "{}", stmt.sql());
    assert!(!stmt.sql().contains("  "), "double space in: {}", stmt.sql());
}

#[test]
fn selects_bind_one_value_per_placeholder() {
    for dialect in Dialect::ALL {
        let grammar = Grammar::new(dialect);
        for query in sample_queries() {
            let stmt = grammar.compile_select(&query).unwrap();
            assert_consistent(&stmt);
        }
    }
}

#[test]
fn sqlserver_offset_paging_keeps_bindings_consistent() {
    let grammar = Grammar::new(Dialect::SqlServer);
    let query = table("users")
        .eq("active", true)
        .in_list("role", ["a", "b"])
        .order_by_desc("created_at")
        .skip(30)
        .take(10);
    let stmt = grammar.compile_select(&query).unwrap();
    assert_consistent(&stmt);
    assert!(stmt.sql().contains("row_num between 31 and 40"));
}

#[test]
fn writes_bind_one_value_per_placeholder() {
    let rows = [
        Row::new().set("email", "a@b.c").set("name", "a"),
        Row::new().set("email", "d@e.f").set("name", "d"),
    ];
    let filtered = table("users")
        .join("orders", "users.id", "=", "orders.user_id")
        .eq("orders.status", "stale")
        .gt("users.id", 10);
    let unjoined = table("users").eq("id", 5);

    for dialect in Dialect::ALL {
        let grammar = Grammar::new(dialect);

        let stmt = grammar.compile_insert(&table("users"), &rows).unwrap();
        assert_consistent(&stmt);
        assert_eq!(stmt.bindings().len(), 4);

        let stmt = grammar
            .compile_insert_get_id(&table("users"), &rows[0], None)
            .unwrap();
        assert_consistent(&stmt);

        let stmt = grammar.compile_update(&filtered, &rows[0]).unwrap();
        assert_consistent(&stmt);
        assert_eq!(stmt.bindings()[0], Value::from("a@b.c"));

        let stmt = grammar.compile_delete(&unjoined).unwrap();
        assert_consistent(&stmt);

        for stmt in grammar.compile_truncate(&table("users")).unwrap() {
            assert_consistent(&stmt);
        }
    }
}

#[test]
fn joined_deletes_bind_consistently_where_supported() {
    let query = table("users")
        .join_with(JoinKind::Inner, "orders", |j| {
            j.on("users.id", "=", "orders.user_id").eq("orders.status", "void")
        })
        .eq("users.active", false);

    for dialect in Dialect::ALL {
        let grammar = Grammar::new(dialect);
        match grammar.compile_delete(&query) {
            Ok(stmt) => {
                assert_consistent(&stmt);
                assert_eq!(stmt.bindings().len(), 2);
            }
            Err(err) => {
                assert_eq!(dialect, Dialect::Sqlite);
                assert!(err.is_unsupported());
            }
        }
    }
}

#[test]
fn numbered_placeholders_skip_quoted_text() {
    let grammar = Grammar::new(Dialect::Postgres);
    let stmt = grammar
        .compile_select(
            &table("users")
                .where_raw("note <> '?'", vec![])
                .eq("id", 1)
                .eq("email", "x"),
        )
        .unwrap();
    assert_eq!(stmt.placeholder_count(), 2);
    assert_eq!(
        stmt.to_numbered_sql("$"),
        r#"select * from "users" where note <> '?' and "id" = $1 and "email" = $2"#
    );
}

#[test]
fn compiled_output_is_deterministic() {
    for dialect in Dialect::ALL {
        let grammar = Grammar::new(dialect);
        for query in sample_queries() {
            let a = grammar.compile_select(&query).unwrap();
            let b = grammar.compile_select(&query).unwrap();
            assert_eq!(a, b);
        }
    }
}
