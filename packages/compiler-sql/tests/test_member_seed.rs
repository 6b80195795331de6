use seedport_compiler_sql::{compile_to_sql, CompileError, Dialect, SqlOptions};
use seedport_parser::{parse_declaration, UnresolvedPolicy, Value};

const SEED: &str = include_str!("../../parser/tests/fixtures/seed.ts");

fn declaration(name: &str) -> Value {
    parse_declaration(SEED, name)
        .expect("Failed to parse")
        .expect("Declaration not found")
        .value
}

#[test]
fn test_member_list_to_postgres() {
    let sql = compile_to_sql(&declaration("memberDataList"), &SqlOptions::new("Member")).unwrap();

    println!("Generated SQL:\n{}", sql);

    assert!(sql.starts_with("-- 3 record(s) for \"Member\"\n"));
    assert_eq!(sql.matches("INSERT INTO \"Member\"").count(), 3);

    // Apostrophes from both quoting styles are doubled
    assert!(sql.contains("It''s about using technology for good."));
    assert!(sql.contains("we''re just getting started."));

    // Arrays land as JSON text
    assert!(sql.contains(r#"'["Technology","Entrepreneurship","Mentoring"]'"#));

    // Anjali has no website, twitter or github
    let anjali = sql.lines().find(|line| line.contains("Anjali")).unwrap();
    assert_eq!(anjali.matches("NULL").count(), 3);
}

#[test]
fn test_member_list_batch_mysql() {
    let mut options = SqlOptions::new("members");
    options.dialect = Dialect::Mysql;
    options.batch = true;
    options.transaction = true;
    options.columns = Some(vec!["email".into(), "name".into(), "cohort".into()]);

    let sql = compile_to_sql(&declaration("memberDataList"), &options).unwrap();

    assert_eq!(
        sql,
        "-- 3 record(s) for `members`\n\
         BEGIN;\n\
         INSERT INTO `members` (`email`, `name`, `cohort`) VALUES\n  \
         ('jane.smith@example.com', 'Jane Smith', '2022'),\n  \
         ('rahul.kumar@example.com', 'Rahul Kumar', '2021'),\n  \
         ('anjali.patel@example.com', 'Anjali Patel', '2020');\n\
         COMMIT;\n"
    );
}

#[test]
fn test_posts_keep_runtime_references_visible() {
    let sql = compile_to_sql(&declaration("posts"), &SqlOptions::new("Post")).unwrap();

    assert!(sql.contains("NULL /* createdMembers[0].id */"));
    assert!(sql.contains("NULL /* createdMembers[1].id */"));
    // JSON.stringify of a literal is evaluated
    assert!(sql.contains(r#"'["mentoring","entrepreneurship"]'"#));
}

#[test]
fn test_announcements_strict_policy() {
    let mut options = SqlOptions::new("Announcement");
    options.unresolved = UnresolvedPolicy::Error;

    match compile_to_sql(&declaration("announcements"), &options) {
        Err(CompileError::Unresolved { path, expr }) => {
            assert_eq!(path, "$[0].createdById");
            assert_eq!(expr, "admin.id");
        }
        other => panic!("expected unresolved error, got {:?}", other),
    }
}

#[test]
fn test_subgroups_need_no_resolution() {
    let mut options = SqlOptions::new("Subgroup");
    options.unresolved = UnresolvedPolicy::Error;

    let sql = compile_to_sql(&declaration("subgroups"), &options).unwrap();
    assert!(sql.contains("'#3B82F6'"));
    assert!(sql.contains("'Mumbai Chapter'"));
}
