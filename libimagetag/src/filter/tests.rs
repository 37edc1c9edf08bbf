use super::*;

fn tags(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

#[test]
fn test_filter_matches_whole_tag() {
    let filter = TagFilter::new(r"\d+\.\d+\.\d+").unwrap();
    assert!(filter.is_match("1.2.0"));
    assert!(!filter.is_match("v1.2.0"));
    assert!(!filter.is_match("1.2.0-alpine"));
    assert!(!filter.is_match("latest"));
}

#[test]
fn test_filter_alternation_is_anchored_as_a_whole() {
    // Each alternative has to match the whole tag.
    let filter = TagFilter::new("latest|stable").unwrap();
    assert!(filter.is_match("latest"));
    assert!(filter.is_match("stable"));
    assert!(!filter.is_match("latest-old"));
    assert!(!filter.is_match("old-stable"));
}

#[test]
fn test_filter_pattern_with_own_anchors() {
    let filter = TagFilter::new(r"^v\d+$").unwrap();
    assert!(filter.is_match("v12"));
    assert!(!filter.is_match("v12.1"));
}

#[test]
fn test_empty_filter_matches_everything() {
    let filter = TagFilter::new("").unwrap();
    assert_eq!(filter.pattern(), MATCH_ALL);
    assert!(filter.is_match("anything"));
    assert!(filter.is_match(""));
}

#[test]
fn test_whitespace_filter_is_literal() {
    let filter = TagFilter::new(" ").unwrap();
    assert_eq!(filter.pattern(), " ");
    assert!(filter.is_match(" "));
    assert!(!filter.is_match("latest"));
}

#[test]
fn test_default_filter_matches_everything() {
    let filter = TagFilter::default();
    assert_eq!(filter.pattern(), ".*");
    assert!(filter.is_match("1.0"));
}

#[test]
fn test_malformed_filter() {
    let err = TagFilter::new("(unclosed").unwrap_err();
    match err {
        ImageTagError::MalformedFilterPattern { pattern, .. } => {
            assert_eq!(pattern, "(unclosed");
        }
        other => panic!("Expected MalformedFilterPattern, got {:?}", other),
    }
}

#[test]
fn test_apply_preserves_order() {
    let filter = TagFilter::new(r"\d+\.\d+\.\d+").unwrap();
    let result = filter.apply(tags(&["1.2.0", "latest", "1.10.0", "1.0"]));
    assert_eq!(result, vec!["1.2.0", "1.10.0"]);
}

#[test]
fn test_apply_is_idempotent() {
    let filter = TagFilter::new(r"3\.\d+(-alpine)?").unwrap();
    let input = tags(&["3.18", "3.19-alpine", "3.19-slim", "edge", "3.20"]);

    let once = filter.apply(input);
    let twice = filter.apply(once.clone());
    assert_eq!(once, twice);
    assert_eq!(once, vec!["3.18", "3.19-alpine", "3.20"]);
}
