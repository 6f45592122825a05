//! Expression rendering: columns, calls, curried calls and literals.

use chrono::NaiveDate;
use snql::prelude::*;

fn render(exp: &Expression) -> String {
    Translation.visit(exp)
}

#[test]
fn test_column() {
    assert_eq!(render(&column("event_id")), "event_id");
    assert_eq!(column("tags[foo]").to_string(), "tags[foo]");
}

#[test]
fn test_function_with_alias() {
    let exp: Expression = Function::new(
        "countIf",
        Some(vec![function("equals", vec![column("type"), lit("error")])]),
        Some("errors".into()),
    )
    .into();
    assert_eq!(render(&exp), "countIf(equals(type, 'error')) AS errors");
}

#[test]
fn test_nested_aliases_are_kept() {
    let inner: Expression = Function::new("max", Some(vec![column("users")]), Some("max_users".into())).into();
    let outer: Expression = Function::new("min", Some(vec![inner]), Some("min_users".into())).into();
    assert_eq!(render(&outer), "min(max(users) AS max_users) AS min_users");
}

#[test]
fn test_zero_argument_call() {
    assert_eq!(render(&function("now", vec![])), "now()");

    // A trailing `()` on the name is folded into an empty parameter list.
    let exp: Expression = Function::new("count()", None, Some("count".into())).into();
    assert_eq!(render(&exp), "count() AS count");
    assert_eq!(
        exp,
        Expression::Function(Function::new("count", Some(vec![]), Some("count".into())))
    );
}

#[test]
fn test_opaque_call_text() {
    let exp: Expression =
        Function::new("uniqIf(user, greater(duration, 1200))", None, Some("misery".into())).into();
    assert_eq!(render(&exp), "uniqIf(user, greater(duration, 1200)) AS misery");
}

#[test]
fn test_curried_function() {
    let exp = curried("quantile(0.75)", vec![column("duration")]);
    assert_eq!(render(&exp), "quantile(0.75)(duration)");

    let aliased: Expression =
        CurriedFunction::new("topK(5)", vec![column("release")], Some("top".into())).into();
    assert_eq!(render(&aliased), "topK(5)(release) AS top");
}

#[test]
fn test_literals() {
    assert_eq!(render(&lit("it's")), r"'it\'s'");
    assert_eq!(render(&lit(r"a\b")), r"'a\\b'");
    assert_eq!(render(&lit(-3i64)), "-3");
    assert_eq!(render(&lit(0.5)), "0.5");
    assert_eq!(render(&lit(true)), "True");
    assert_eq!(render(&Scalar::Null.into()), "NULL");
}

#[test]
fn test_datetime_literal() {
    let dt = NaiveDate::from_ymd_opt(2021, 1, 15)
        .unwrap()
        .and_hms_micro_opt(20, 51, 47, 110825)
        .unwrap();
    assert_eq!(render(&lit(dt)), "toDateTime('2021-01-15T20:51:47.110825')");

    let whole = NaiveDate::from_ymd_opt(2021, 1, 15)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    assert_eq!(render(&lit(whole)), "toDateTime('2021-01-15T00:00:00')");
}

#[test]
fn test_coerced_string_becomes_datetime() {
    let exp: Expression = Scalar::from("2020-10-17T20:51:46.110774").coerce().into();
    assert_eq!(render(&exp), "toDateTime('2020-10-17T20:51:46.110774')");

    let plain: Expression = Scalar::from("2020-10-17").coerce().into();
    assert_eq!(render(&plain), "'2020-10-17'");
}

#[test]
fn test_nested_containers() {
    let exp: Expression = Scalar::Array(vec![
        Scalar::Tuple(vec![Scalar::Int(1), Scalar::String("a".into())]),
        Scalar::Array(vec![]),
    ])
    .into();
    assert_eq!(render(&exp), "array(tuple(1, 'a'), array())");
}

#[test]
fn test_kind_names() {
    assert_eq!(column("a").kind_name(), "Column");
    assert_eq!(function("f", vec![]).kind_name(), "Function");
    assert_eq!(curried("f(1)", vec![column("a")]).kind_name(), "CurriedFunction");
    assert_eq!(lit(1i64).kind_name(), "int");
}
