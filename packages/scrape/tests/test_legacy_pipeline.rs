use seedport_scrape::{extract_list, normalize_literal};

#[test]
fn test_flat_list_becomes_valid_json() {
    let source = r#"
        // Skills offered in the directory
        const skills = [
          'Social Innovation', // most common
          'Impact Measurement',
          'Community Building',
        ];
    "#;

    let normalized = normalize_literal(&extract_list(source, "skills"));
    let parsed: serde_json::Value = serde_json::from_str(&normalized).expect("valid JSON");

    assert_eq!(
        parsed,
        serde_json::json!(["Social Innovation", "Impact Measurement", "Community Building"])
    );
}

#[test]
fn test_missing_list_normalizes_to_empty_array() {
    let normalized = normalize_literal(&extract_list("const other = [1]", "skills"));
    let parsed: serde_json::Value = serde_json::from_str(&normalized).unwrap();

    assert_eq!(parsed, serde_json::json!([]));
}

#[test]
fn test_nested_member_list_is_truncated() {
    let source = r#"
        const memberDataList = [
          {
            name: 'Jane Smith',
            skills: ['Social Innovation', 'Community Building'],
            cohort: '2022',
          },
        ]
    "#;

    let extracted = extract_list(source, "memberDataList");
    assert!(extracted.ends_with("'Community Building']"));
    assert!(!extracted.contains("cohort"));

    // The cut-off text is not JSON even after normalizing
    let normalized = normalize_literal(&extracted);
    assert!(serde_json::from_str::<serde_json::Value>(&normalized).is_err());
}

#[test]
fn test_urls_are_corrupted_by_comment_stripping() {
    let source = "const links = ['https://example.com', 'plain']";

    let extracted = extract_list(source, "links");
    assert_eq!(extracted, "['https://example.com', 'plain']");

    // `//` inside the string is taken for a comment
    let normalized = normalize_literal(&extracted);
    assert_eq!(normalized, "[\"\"https\":");
}
