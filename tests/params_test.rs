use std::collections::HashMap;

use taskgrid::query::QueryError;
use taskgrid::query::params::TableQuery;

fn base_params() -> HashMap<String, String> {
    let mut params = HashMap::new();
    for (k, v) in [
        ("draw", "7"),
        ("start", "0"),
        ("length", "25"),
        ("search[value]", "failed"),
        ("order[0][column]", "2"),
        ("columns[2][data]", "state"),
        ("order[0][dir]", "asc"),
        ("grouping", "false"),
    ] {
        params.insert(k.to_string(), v.to_string());
    }
    params
}

#[test]
fn test_parse_full_request() {
    let query = TableQuery::from_params(&base_params()).unwrap();
    assert_eq!(query.draw, 7);
    assert_eq!(query.start, 0);
    assert_eq!(query.length, 25);
    assert_eq!(query.search, "failed");
    assert_eq!(query.sort_by, "state");
    assert!(query.ascending);
    assert!(!query.grouping);
}

#[test]
fn test_missing_draw_is_rejected() {
    let mut params = base_params();
    params.remove("draw");
    let err = TableQuery::from_params(&params).unwrap_err();
    assert!(matches!(err, QueryError::MalformedParameter { ref name, .. } if name == "draw"));
}

#[test]
fn test_non_numeric_start_is_rejected() {
    let mut params = base_params();
    params.insert("start".to_string(), "soon".to_string());
    let err = TableQuery::from_params(&params).unwrap_err();
    assert!(matches!(err, QueryError::MalformedParameter { ref name, .. } if name == "start"));
}

#[test]
fn test_zero_length_is_rejected() {
    let mut params = base_params();
    params.insert("length".to_string(), "0".to_string());
    let err = TableQuery::from_params(&params).unwrap_err();
    assert!(matches!(err, QueryError::MalformedParameter { ref name, .. } if name == "length"));
}

#[test]
fn test_sort_column_resolves_through_column_list() {
    let mut params = base_params();
    params.insert("order[0][column]".to_string(), "5".to_string());
    // No columns[5][data] entry: the index cannot be resolved to a name.
    let err = TableQuery::from_params(&params).unwrap_err();
    assert!(
        matches!(err, QueryError::MalformedParameter { ref name, .. } if name == "columns[5][data]")
    );

    params.insert("columns[5][data]".to_string(), "worker".to_string());
    let query = TableQuery::from_params(&params).unwrap();
    assert_eq!(query.sort_by, "worker");
}

#[test]
fn test_desc_direction_and_grouping_flags() {
    let mut params = base_params();
    params.insert("order[0][dir]".to_string(), "desc".to_string());
    params.insert("grouping".to_string(), "1".to_string());
    let query = TableQuery::from_params(&params).unwrap();
    assert!(!query.ascending);
    assert!(query.grouping);
}

#[test]
fn test_unparseable_grouping_is_rejected() {
    let mut params = base_params();
    params.insert("grouping".to_string(), "maybe".to_string());
    let err = TableQuery::from_params(&params).unwrap_err();
    assert!(matches!(err, QueryError::MalformedParameter { ref name, .. } if name == "grouping"));
}

#[test]
fn test_missing_search_defaults_to_empty() {
    let mut params = base_params();
    params.remove("search[value]");
    let query = TableQuery::from_params(&params).unwrap();
    assert_eq!(query.search, "");
}
