//! Integration tests for legacy body → SnQL translation.
//!
//! Bodies carry tuples, which JSON cannot express, so they are assembled
//! from `serde_json::json!` plus explicit `LegacyValue::Tuple` patches.

use serde_json::json;
use snql::config::{LegacySettings, ScopeField};
use snql::legacy::{json_to_snql, json_to_snql_with, Body, InvalidQuery, LegacyValue};

// ============================================================================
// Helpers
// ============================================================================

fn body(value: serde_json::Value) -> Body {
    match LegacyValue::from(value) {
        LegacyValue::Map(map) => map,
        other => panic!("test body must be an object, got {:?}", other),
    }
}

fn tuple(items: Vec<LegacyValue>) -> LegacyValue {
    LegacyValue::Tuple(items)
}

/// The conditions shared by every full-coverage body:
/// `project_id IN [2]`, `array_stuff IN [[2]]`, `tuple_stuff IN ((2,),)`
/// and a date-time string compared against `bucketed_started`.
fn shared_conditions() -> LegacyValue {
    LegacyValue::List(vec![
        LegacyValue::from(json!(["project_id", "IN", [2]])),
        LegacyValue::from(json!(["array_stuff", "IN", [[2]]])),
        LegacyValue::List(vec![
            "tuple_stuff".into(),
            "IN".into(),
            tuple(vec![tuple(vec![LegacyValue::Int(2)])]),
        ]),
        LegacyValue::from(json!([
            "bucketed_started",
            ">",
            "2020-10-17T20:51:46.110774"
        ])),
    ])
}

/// A sessions body with the shared conditions and scope fields filled in.
fn sessions_body(extra: serde_json::Value) -> Body {
    let mut b = body(json!({
        "selected_columns": ["project_id", "release"],
        "offset": 0,
        "limit": 100,
        "limitby": [11, "release"],
        "project": [2],
        "dataset": "sessions",
        "from_date": "2020-10-17T20:51:46.110774",
        "to_date": "2021-01-15T20:51:47.110825",
        "having": [["min_users", ">", 10]],
        "aggregations": [["min", [["max", ["users"], "max_users"]], "min_users"]],
    }));
    b.insert("organization".into(), tuple(vec![LegacyValue::Int(2)]));
    b.insert("conditions".into(), shared_conditions());
    b.extend(body(extra));
    b
}

const SHARED_WHERE: &str = "WHERE project_id IN array(2) \
    AND array_stuff IN array(array(2)) \
    AND tuple_stuff IN tuple(tuple(2)) \
    AND bucketed_started > toDateTime('2020-10-17T20:51:46.110774') \
    AND project_id IN array(2) \
    AND org_id IN tuple(2) \
    AND started > toDateTime('2020-10-17T20:51:46.110774') \
    AND started <= toDateTime('2021-01-15T20:51:47.110825')";

fn expected(lines: &[&str]) -> String {
    lines.join("\n")
}

// ============================================================================
// Full body translation
// ============================================================================

#[test]
fn test_cover_as_many_cases_as_possible() {
    let b = sessions_body(json!({
        "orderby": "sessions",
        "groupby": ["release", "project_id"],
        "consistent": true,
        "granularity": 86400,
        "totals": true,
        "sample": 0.1,
        "debug": true,
    }));

    let query = json_to_snql(&b, "sessions").unwrap();
    assert_eq!(
        query.print(),
        expected(&[
            "-- DATASET: sessions",
            "-- CONSISTENT: True",
            "-- DEBUG: True",
            "MATCH (sessions SAMPLE 0.100000)",
            "SELECT project_id, release, min(max(users) AS max_users) AS min_users",
            "BY release, project_id",
            SHARED_WHERE,
            "HAVING min_users > 10",
            "ORDER BY sessions ASC",
            "LIMIT 11 BY release",
            "LIMIT 100",
            "OFFSET 0",
            "GRANULARITY 86400",
            "TOTALS True",
        ])
    );
}

#[test]
fn test_multiple_order_by() {
    let b = sessions_body(json!({
        "orderby": ["sessions", "-project_id"],
        "groupby": ["release", "project_id"],
        "consistent": true,
        "sample": 1000,
    }));

    let query = json_to_snql(&b, "sessions").unwrap();
    assert_eq!(
        query.print(),
        expected(&[
            "-- DATASET: sessions",
            "-- CONSISTENT: True",
            "MATCH (sessions SAMPLE 1000)",
            "SELECT project_id, release, min(max(users) AS max_users) AS min_users",
            "BY release, project_id",
            SHARED_WHERE,
            "HAVING min_users > 10",
            "ORDER BY sessions ASC, project_id DESC",
            "LIMIT 11 BY release",
            "LIMIT 100",
            "OFFSET 0",
        ])
    );
}

#[test]
fn test_function_order_by() {
    let b = sessions_body(json!({
        "orderby": [["divide", ["sessions_crashed", "sessions"]]],
        "groupby": ["release", "project_id"],
        "consistent": false,
        "turbo": true,
    }));

    let query = json_to_snql(&b, "sessions").unwrap();
    assert_eq!(
        query.print(),
        expected(&[
            "-- DATASET: sessions",
            "-- TURBO: True",
            "MATCH (sessions)",
            "SELECT project_id, release, min(max(users) AS max_users) AS min_users",
            "BY release, project_id",
            SHARED_WHERE,
            "HAVING min_users > 10",
            "ORDER BY divide(sessions_crashed, sessions) ASC",
            "LIMIT 11 BY release",
            "LIMIT 100",
            "OFFSET 0",
        ])
    );
}

#[test]
fn test_arrayjoin() {
    let b = sessions_body(json!({
        "selected_columns": ["project_id", "release", "array_stuff"],
        "orderby": ["sessions", "-project_id"],
        "aggregations": [],
        "consistent": false,
        "arrayjoin": "array_stuff",
    }));

    let query = json_to_snql(&b, "sessions").unwrap();
    assert_eq!(
        query.print(),
        expected(&[
            "-- DATASET: sessions",
            "MATCH (sessions)",
            "SELECT project_id, release, array_stuff, arrayJoin(array_stuff) AS array_stuff",
            SHARED_WHERE,
            "HAVING min_users > 10",
            "ORDER BY sessions ASC, project_id DESC",
            "LIMIT 11 BY release",
            "LIMIT 100",
            "OFFSET 0",
        ])
    );
}

#[test]
fn test_curried_and_string_functions() {
    let b = sessions_body(json!({
        "orderby": ["sessions", "-project_id"],
        "aggregations": [
            ["apdex(duration, 300)", null, "apdex"],
            ["uniqIf(user, greater(duration, 1200))", null, "misery"],
            ["quantile(0.75)", "duration", "p75"],
        ],
        "consistent": false,
    }));

    let query = json_to_snql(&b, "sessions").unwrap();
    assert_eq!(
        query.print(),
        expected(&[
            "-- DATASET: sessions",
            "MATCH (sessions)",
            "SELECT project_id, release, apdex(duration, 300) AS apdex, \
             uniqIf(user, greater(duration, 1200)) AS misery, \
             quantile(0.75)(duration) AS p75",
            SHARED_WHERE,
            "HAVING min_users > 10",
            "ORDER BY sessions ASC, project_id DESC",
            "LIMIT 11 BY release",
            "LIMIT 100",
            "OFFSET 0",
        ])
    );
}

// ============================================================================
// Clause-level behavior
// ============================================================================

#[test]
fn test_single_desc_order_by() {
    let b = body(json!({"selected_columns": ["project_id"], "orderby": "-project_id"}));
    let query = json_to_snql(&b, "sessions").unwrap();
    assert!(query.print().ends_with("ORDER BY project_id DESC"));
}

#[test]
fn test_where_order_explicit_then_scope() {
    let mut b = body(json!({
        "selected_columns": ["project_id"],
        "conditions": [["project_id", "IN", [2]]],
        "project": [2],
    }));
    b.insert("organization".into(), tuple(vec![LegacyValue::Int(2)]));

    let query = json_to_snql(&b, "sessions").unwrap();
    assert!(query.print().contains(
        "WHERE project_id IN array(2) AND project_id IN array(2) AND org_id IN tuple(2)"
    ));
}

#[test]
fn test_scalar_scope_uses_equality() {
    let b = body(json!({"selected_columns": ["a"], "project": 2, "organization": 3}));
    let query = json_to_snql(&b, "sessions").unwrap();
    assert!(query.print().contains("WHERE project_id = 2 AND org_id = 3"));
}

#[test]
fn test_empty_body() {
    let query = json_to_snql(&Body::new(), "events").unwrap();
    assert_eq!(query.print(), "-- DATASET: \nMATCH (events)");
}

#[test]
fn test_groupby_single_value() {
    let b = body(json!({"selected_columns": ["a"], "groupby": "release"}));
    let query = json_to_snql(&b, "sessions").unwrap();
    assert!(query.print().contains("\nBY release"));
}

#[test]
fn test_empty_dates_are_skipped() {
    let b = body(json!({"selected_columns": ["a"], "from_date": "", "to_date": null}));
    let query = json_to_snql(&b, "sessions").unwrap();
    assert!(!query.print().contains("WHERE"));
}

#[test]
fn test_explicit_false_and_zero_are_copied() {
    let b = body(json!({"selected_columns": ["a"], "totals": false, "offset": 0}));
    let query = json_to_snql(&b, "sessions").unwrap();
    assert_eq!(query.totals, Some(false));
    assert_eq!(query.offset, Some(0));
    assert!(query.print().ends_with("OFFSET 0\nTOTALS False"));
}

#[test]
fn test_having_kept_separate() {
    let b = body(json!({
        "selected_columns": ["a"],
        "conditions": [["a", "=", 1]],
        "having": [["b", "IS NOT NULL", null]],
    }));
    let query = json_to_snql(&b, "sessions").unwrap();
    assert_eq!(query.where_clause.len(), 1);
    assert_eq!(query.having.len(), 1);
    assert!(query.print().contains("WHERE a = 1\nHAVING b IS NOT NULL"));
}

// ============================================================================
// Settings
// ============================================================================

#[test]
fn test_custom_time_column_and_scope() {
    let settings = LegacySettings {
        time_column: "timestamp".into(),
        default_dataset: "events".into(),
        scope: vec![ScopeField::new("project", "project_id")],
    };
    let b = body(json!({
        "selected_columns": ["a"],
        "project": 1,
        "organization": 2,
        "from_date": "2020-10-17T20:51:46.110774",
    }));

    let query = json_to_snql_with(&b, "events", &settings).unwrap();
    assert_eq!(
        query.print(),
        expected(&[
            "-- DATASET: events",
            "MATCH (events)",
            "SELECT a",
            "WHERE project_id = 1 AND timestamp > toDateTime('2020-10-17T20:51:46.110774')",
        ])
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_or_condition_rejected() {
    let b = body(json!({
        "conditions": [[["a", "=", 1], ["b", "=", 2]]],
    }));
    let err = json_to_snql(&b, "sessions").unwrap_err();
    assert_eq!(
        err,
        InvalidQuery::UnsupportedGrouping {
            clause: "conditions",
            index: 0
        }
    );
}

#[test]
fn test_non_string_operator_rejected() {
    let b = body(json!({
        "having": [["a", "=", 1], ["b", 1, 2]],
    }));
    let err = json_to_snql(&b, "sessions").unwrap_err();
    assert_eq!(
        err,
        InvalidQuery::UnsupportedGrouping {
            clause: "having",
            index: 1
        }
    );
}

#[test]
fn test_scalar_lhs_rejected() {
    let b = body(json!({"conditions": [[1, "=", 1]]}));
    let err = json_to_snql(&b, "sessions").unwrap_err();
    assert!(err.to_string().contains("not int"), "{}", err);
}

#[test]
fn test_bad_date_rejected() {
    let b = body(json!({"to_date": "2021-01-15"}));
    let err = json_to_snql(&b, "sessions").unwrap_err();
    assert!(matches!(
        err,
        InvalidQuery::InvalidShape {
            field: "to_date",
            ..
        }
    ));
}

#[test]
fn test_bad_limitby_rejected() {
    let b = body(json!({"limitby": [11]}));
    let err = json_to_snql(&b, "sessions").unwrap_err();
    assert!(matches!(
        err,
        InvalidQuery::InvalidShape {
            field: "limitby",
            ..
        }
    ));
}
