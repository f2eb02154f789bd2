use sqlgram::{table, Dialect, Filter, Grammar, GrammarConfig, GrammarError};

fn write_config(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("sqlgram-{}-{name}.toml", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn grammar_from_config_file() {
    let path = write_config(
        "mysql",
        "dialect = \"mariadb\"\ntable_prefix = \"wp_\"\nlog_max_sql_length = 80\n",
    );
    let config = GrammarConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let grammar = Grammar::from_config(&config).unwrap();
    assert_eq!(grammar.dialect(), Dialect::MySql);
    assert_eq!(grammar.table_prefix(), "wp_");

    let stmt = grammar
        .compile_select(&table("posts").eq("post_status", "publish"))
        .unwrap();
    assert_eq!(stmt.sql(), "select * from `wp_posts` where `post_status` = ?");
}

#[test]
fn load_reports_path_on_parse_error() {
    let path = write_config("broken", "dialect = \"postgres\"\nunknown_key = 1\n");
    let err = GrammarConfig::load(&path).unwrap_err();
    std::fs::remove_file(&path).ok();

    assert!(matches!(err, GrammarError::Config(_)));
    assert!(err.to_string().contains("failed to parse config file"));
}

#[test]
fn from_config_validates_prefix() {
    let mut config = GrammarConfig::new(Dialect::Sqlite);
    config.table_prefix = "bad prefix".into();
    assert!(Grammar::from_config(&config).is_err());
}

#[test]
fn dialect_names_round_trip() {
    for dialect in Dialect::ALL {
        let parsed: Dialect = dialect.as_str().parse().unwrap();
        assert_eq!(parsed, dialect);
        assert_eq!(dialect.to_string(), dialect.as_str());
    }
}
