use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlgram::{table, Dialect, Filter, Grammar, JoinKind, Query, Row};

/// A select with `n` equality predicates and an `n`-element in list.
fn build_select(n: usize) -> Query {
    let mut query = table("users")
        .select(&["id", "email", "name"])
        .join_with(JoinKind::Left, "profiles", |j| {
            j.on("users.id", "=", "profiles.user_id")
        });
    for i in 0..n {
        query = query.eq(&format!("col{i}"), i as i64);
    }
    query
        .in_list("status", (0..n as i64).collect::<Vec<_>>())
        .order_by_desc("created_at")
        .for_page(2, 20)
}

fn bench_compile_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/select");

    for n in [1, 5, 10, 50, 100] {
        let query = build_select(n);
        for dialect in [Dialect::MySql, Dialect::Postgres, Dialect::SqlServer] {
            let grammar = Grammar::new(dialect);
            group.bench_with_input(
                BenchmarkId::new(dialect.as_str(), n),
                &query,
                |b, query| {
                    b.iter(|| black_box(grammar.compile_select(query)));
                },
            );
        }
    }

    group.finish();
}

fn bench_compile_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/insert");
    let grammar = Grammar::new(Dialect::Postgres);

    for n in [1, 10, 100, 500] {
        let rows: Vec<Row> = (0..n)
            .map(|i| Row::new().set("email", format!("user{i}@example.com")).set("rank", i as i64))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &rows, |b, rows| {
            b.iter(|| black_box(grammar.compile_insert(&table("users"), rows)));
        });
    }

    group.finish();
}

fn bench_numbered_sql(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/to_numbered_sql");
    let grammar = Grammar::new(Dialect::Postgres);

    for n in [5, 50, 500] {
        let stmt = grammar.compile_select(&build_select(n)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &stmt, |b, stmt| {
            b.iter(|| black_box(stmt.to_numbered_sql("$")));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compile_select,
    bench_compile_insert,
    bench_numbered_sql
);
criterion_main!(benches);
