use crate::{compile_to_sql, CompileError, Dialect, SqlOptions};
use seedport_parser::{parse_literal, UnresolvedPolicy};

fn compile(source: &str, options: &SqlOptions) -> String {
    let value = parse_literal(source).expect("Failed to parse");
    compile_to_sql(&value, options).expect("Failed to compile")
}

#[test]
fn test_simple_insert() {
    let sql = compile(
        "[{ name: 'Alice', age: 30 }, { name: 'Bob', age: 25.5 }]",
        &SqlOptions::new("Member"),
    );

    println!("Generated SQL:\n{}", sql);

    assert_eq!(
        sql,
        "-- 2 record(s) for \"Member\"\n\
         INSERT INTO \"Member\" (\"name\", \"age\") VALUES ('Alice', 30);\n\
         INSERT INTO \"Member\" (\"name\", \"age\") VALUES ('Bob', 25.5);\n"
    );
}

#[test]
fn test_batch_insert() {
    let mut options = SqlOptions::new("Member");
    options.batch = true;

    let sql = compile("[{ id: 1 }, { id: 2 }, { id: 3 }]", &options);

    println!("Generated SQL:\n{}", sql);

    assert_eq!(
        sql,
        "-- 3 record(s) for \"Member\"\n\
         INSERT INTO \"Member\" (\"id\") VALUES\n  (1),\n  (2),\n  (3);\n"
    );
}

#[test]
fn test_transaction_wraps_statements() {
    let mut options = SqlOptions::new("Member");
    options.transaction = true;

    let sql = compile("[{ id: 1 }]", &options);
    let lines: Vec<&str> = sql.lines().collect();

    assert_eq!(lines[1], "BEGIN;");
    assert_eq!(lines[2], "INSERT INTO \"Member\" (\"id\") VALUES (1);");
    assert_eq!(lines[3], "COMMIT;");
}

#[test]
fn test_empty_list_emits_header_only() {
    let sql = compile("[]", &SqlOptions::new("Member"));
    assert_eq!(sql, "-- 0 record(s) for \"Member\"\n");
}

#[test]
fn test_single_object_is_one_record() {
    let sql = compile("{ title: 'Welcome' }", &SqlOptions::new("Announcement"));
    assert!(sql.contains("-- 1 record(s)"));
    assert!(sql.contains("VALUES ('Welcome');"));
}

#[test]
fn test_missing_keys_become_null() {
    let sql = compile(
        "[{ name: 'Jane', linkedin: 'in/jane' }, { name: 'Rahul', github: 'rahul' }]",
        &SqlOptions::new("Member"),
    );

    assert!(sql.contains("(\"name\", \"linkedin\", \"github\")"));
    assert!(sql.contains("VALUES ('Jane', 'in/jane', NULL);"));
    assert!(sql.contains("VALUES ('Rahul', NULL, 'rahul');"));
}

#[test]
fn test_string_escaping() {
    let sql = compile(r#"[{ bio: 'It\'s "fine"' }]"#, &SqlOptions::new("Member"));
    assert!(sql.contains(r#"VALUES ('It''s "fine"');"#));
}

#[test]
fn test_mysql_dialect() {
    let mut options = SqlOptions::new("app.Member");
    options.dialect = Dialect::Mysql;

    let sql = compile(r#"[{ active: true, path: 'C:\\seed' }]"#, &options);

    println!("Generated SQL:\n{}", sql);

    assert!(sql.contains("INSERT INTO `app`.`Member` (`active`, `path`)"));
    assert!(sql.contains(r"VALUES (TRUE, 'C:\\seed');"));
}

#[test]
fn test_sqlite_booleans() {
    let mut options = SqlOptions::new("Member");
    options.dialect = Dialect::Sqlite;

    let sql = compile("[{ active: true, banned: false }]", &options);
    assert!(sql.contains("VALUES (1, 0);"));
}

#[test]
fn test_columns_rename_and_exclude() {
    let mut options = SqlOptions::new("Member");
    options.columns = Some(vec!["email".into(), "name".into(), "password".into()]);
    options.exclude = vec!["password".into()];
    options.rename.insert("name".into(), "full_name".into());

    let sql = compile(
        "[{ name: 'Jane', email: 'jane@example.com', password: 'secret' }]",
        &options,
    );

    assert!(sql.contains("(\"email\", \"full_name\")"));
    assert!(sql.contains("VALUES ('jane@example.com', 'Jane');"));
    assert!(!sql.contains("secret"));
}

#[test]
fn test_nested_values_become_json_text() {
    let sql = compile(
        "[{ skills: ['React', 'Node'], social: { github: 'jane' } }]",
        &SqlOptions::new("Member"),
    );

    assert!(sql.contains(r#"VALUES ('["React","Node"]', '{"github":"jane"}');"#));
}

#[test]
fn test_unresolved_expression_becomes_null_comment() {
    let sql = compile(
        "[{ title: 'Hello', authorId: admin.id }]",
        &SqlOptions::new("Post"),
    );

    assert!(sql.contains("VALUES ('Hello', NULL /* admin.id */);"));
}

#[test]
fn test_unresolved_comment_cannot_escape() {
    let sql = compile("[{ x: a */ b }]", &SqlOptions::new("T"));
    assert!(sql.contains("NULL /* a * / b */"));
}

#[test]
fn test_unresolved_error_names_path() {
    let mut options = SqlOptions::new("Post");
    options.unresolved = UnresolvedPolicy::Error;

    let value = parse_literal("[{ title: 'ok' }, { authorId: admin.id }]").unwrap();

    match compile_to_sql(&value, &options) {
        Err(CompileError::Unresolved { path, expr }) => {
            assert_eq!(path, "$[1].authorId");
            assert_eq!(expr, "admin.id");
        }
        other => panic!("expected unresolved error, got {:?}", other),
    }
}

#[test]
fn test_unresolved_error_inside_nested_value() {
    let mut options = SqlOptions::new("Post");
    options.unresolved = UnresolvedPolicy::Error;

    let value = parse_literal("[{ tags: ['a', user.tag] }]").unwrap();

    match compile_to_sql(&value, &options) {
        Err(CompileError::Unresolved { path, .. }) => assert_eq!(path, "$[0].tags[1]"),
        other => panic!("expected unresolved error, got {:?}", other),
    }
}

#[test]
fn test_non_object_record_is_rejected() {
    let value = parse_literal("[{ id: 1 }, 'oops']").unwrap();

    match compile_to_sql(&value, &SqlOptions::new("T")) {
        Err(CompileError::InvalidRecord { index, kind }) => {
            assert_eq!(index, 1);
            assert_eq!(kind, "string");
        }
        other => panic!("expected invalid record error, got {:?}", other),
    }
}

#[test]
fn test_scalar_root_is_rejected() {
    let value = parse_literal("42").unwrap();
    assert!(matches!(
        compile_to_sql(&value, &SqlOptions::new("T")),
        Err(CompileError::InvalidRoot(_))
    ));
}

#[test]
fn test_everything_excluded_is_an_error() {
    let mut options = SqlOptions::new("T");
    options.exclude = vec!["id".into()];

    let value = parse_literal("[{ id: 1 }]").unwrap();
    assert!(matches!(
        compile_to_sql(&value, &options),
        Err(CompileError::NoColumns(_))
    ));
}

#[test]
fn test_dialect_from_str() {
    assert_eq!("pg".parse::<Dialect>().unwrap(), Dialect::Postgres);
    assert_eq!("MariaDB".parse::<Dialect>().unwrap(), Dialect::Mysql);
    assert_eq!("sqlite3".parse::<Dialect>().unwrap(), Dialect::Sqlite);
    assert!("oracle".parse::<Dialect>().is_err());
}

#[test]
fn test_dotted_key_is_one_column() {
    let sql = compile("[{ 'meta.version': 1 }]", &SqlOptions::new("public.T"));

    assert!(sql.contains(r#"INSERT INTO "public"."T" ("meta.version") VALUES (1);"#));
}

#[test]
fn test_quote_characters_in_identifiers_are_doubled() {
    let sql = compile(r#"[{ 'say "hi"': 1 }]"#, &SqlOptions::new("T"));
    assert!(sql.contains(r#"("say ""hi""")"#));

    let mut options = SqlOptions::new("T");
    options.dialect = Dialect::Mysql;
    let sql = compile("[{ 'a`b': 1 }]", &options);
    assert!(sql.contains("(`a``b`)"));
}

#[test]
fn test_table_name_cannot_break_header_comment() {
    let sql = compile("[{ id: 1 }]", &SqlOptions::new("T\nDROP TABLE x;--"));
    let lines: Vec<&str> = sql.lines().collect();

    assert_eq!(lines[0], "-- 1 record(s) for \"T DROP TABLE x;--\"");
    assert!(lines[1].starts_with("INSERT INTO \"T"));
}
