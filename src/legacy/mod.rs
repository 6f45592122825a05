//! Translation of legacy JSON query bodies into SnQL queries.
//!
//! The legacy body is a flat map of clause names to loosely typed values:
//!
//! ```text
//! {
//!   "selected_columns": ["project_id", ["min", ["started"], "oldest"]],
//!   "conditions": [["release", "IN", ["foo@1.0.0"]]],
//!   "orderby": "-sessions",
//!   "project": [2],
//!   "from_date": "2020-10-17T20:51:46.110774",
//!   ...
//! }
//! ```
//!
//! Nested lists encode function calls as `[name, args, alias?]`. See
//! [`parse_exp`] for the full grammar.

mod value;

pub use value::{Body, LegacyValue};

use tracing::{debug, trace};

use crate::config::LegacySettings;
use crate::snql::condition::{Condition, InvalidExpression, Op};
use crate::snql::expr::{Column, CurriedFunction, Expression, Function};
use crate::snql::query::{Direction, Entity, LimitBy, OrderBy, Query, SampleRate};
use crate::snql::scalar::{parse_datetime, Scalar};

/// Error raised when a legacy body cannot be translated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidQuery {
    /// A condition entry is not a `[lhs, op, rhs]` triple, which is how the
    /// legacy format spells OR groups.
    #[error("OR conditions not supported yet: {clause}[{index}] is not a [lhs, op, rhs] triple")]
    UnsupportedGrouping { clause: &'static str, index: usize },

    #[error(transparent)]
    InvalidExpression(#[from] InvalidExpression),

    #[error("invalid '{field}': expected {expected}, found {found}")]
    InvalidShape {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

impl InvalidQuery {
    fn shape(field: &'static str, expected: &'static str, value: &LegacyValue) -> Self {
        InvalidQuery::InvalidShape {
            field,
            expected,
            found: value.type_name(),
        }
    }
}

/// Field name, setter pair for a value copied through verbatim.
type Passthrough = (
    &'static str,
    fn(Query, &LegacyValue) -> Result<Query, InvalidQuery>,
);

/// Clause values copied onto the query when present and not null.
const PASSTHROUGH: [Passthrough; 7] = [
    ("limit", apply_limit),
    ("offset", apply_offset),
    ("granularity", apply_granularity),
    ("totals", apply_totals),
    ("consistent", apply_consistent),
    ("turbo", apply_turbo),
    ("debug", apply_debug),
];

fn apply_limit(query: Query, value: &LegacyValue) -> Result<Query, InvalidQuery> {
    Ok(query.set_limit(expect_uint("limit", value)?))
}

fn apply_offset(query: Query, value: &LegacyValue) -> Result<Query, InvalidQuery> {
    Ok(query.set_offset(expect_uint("offset", value)?))
}

fn apply_granularity(query: Query, value: &LegacyValue) -> Result<Query, InvalidQuery> {
    Ok(query.set_granularity(expect_uint("granularity", value)?))
}

fn apply_totals(query: Query, value: &LegacyValue) -> Result<Query, InvalidQuery> {
    Ok(query.set_totals(expect_bool("totals", value)?))
}

fn apply_consistent(query: Query, value: &LegacyValue) -> Result<Query, InvalidQuery> {
    Ok(query.set_consistent(expect_bool("consistent", value)?))
}

fn apply_turbo(query: Query, value: &LegacyValue) -> Result<Query, InvalidQuery> {
    Ok(query.set_turbo(expect_bool("turbo", value)?))
}

fn apply_debug(query: Query, value: &LegacyValue) -> Result<Query, InvalidQuery> {
    Ok(query.set_debug(expect_bool("debug", value)?))
}

fn expect_uint(field: &'static str, value: &LegacyValue) -> Result<u64, InvalidQuery> {
    match value {
        LegacyValue::Int(n) if *n >= 0 => Ok(*n as u64),
        other => Err(InvalidQuery::shape(field, "a non-negative integer", other)),
    }
}

fn expect_bool(field: &'static str, value: &LegacyValue) -> Result<bool, InvalidQuery> {
    match value {
        LegacyValue::Bool(b) => Ok(*b),
        other => Err(InvalidQuery::shape(field, "a boolean", other)),
    }
}

// =============================================================================
// Scalar and expression parsing
// =============================================================================

/// Coerce a legacy value into a scalar literal.
///
/// Strings in the exact `YYYY-MM-DDTHH:MM:SS.ffffff` form become date-times;
/// lists and tuples are coerced element-wise. Maps have no scalar form.
pub fn parse_scalar(value: &LegacyValue) -> Result<Scalar, InvalidQuery> {
    value
        .to_raw_scalar()
        .map(Scalar::coerce)
        .ok_or(InvalidQuery::InvalidExpression(
            InvalidExpression::WrongRhsKind { found: "map" },
        ))
}

/// Parse one node of the nested-list expression grammar.
///
/// - a string is a column;
/// - a list `[name, args, alias?]` is a call, where `args` is a single nested
///   expression, a list of them, or falsy for a call with no parameter list;
/// - a name that is itself a call, such as `quantile(0.75)`, with arguments
///   becomes a curried call;
/// - anything else is a scalar literal.
pub fn parse_exp(value: &LegacyValue) -> Result<Expression, InvalidQuery> {
    let items = match value {
        LegacyValue::String(name) => return Ok(Column::new(name.as_str()).into()),
        LegacyValue::List(items) => items,
        other => return Ok(parse_scalar(other)?.into()),
    };

    let name = match items.first() {
        Some(LegacyValue::String(name)) => name.as_str(),
        Some(other) => return Err(InvalidQuery::shape("function", "a function name", other)),
        None => {
            return Err(InvalidQuery::shape(
                "function",
                "a [name, args, alias] list",
                value,
            ))
        }
    };

    let alias = match items.get(2) {
        None | Some(LegacyValue::Null) => None,
        Some(LegacyValue::String(alias)) => Some(alias.clone()),
        Some(other) => return Err(InvalidQuery::shape("alias", "a string", other)),
    };

    let parameters = match items.get(1) {
        Some(LegacyValue::List(args)) => Some(
            args.iter()
                .map(parse_exp)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Some(arg) if arg.is_truthy() => Some(vec![parse_exp(arg)?]),
        _ => None,
    };

    match parameters {
        Some(params) if is_call_text(name) && !params.is_empty() => {
            Ok(CurriedFunction::new(name, params, alias).into())
        }
        parameters => Ok(Function::new(name, parameters, alias).into()),
    }
}

/// True when a function name is already a serialized call.
fn is_call_text(name: &str) -> bool {
    name.contains('(') && name.ends_with(')')
}

fn parse_conditions(
    entries: Option<&LegacyValue>,
    clause: &'static str,
) -> Result<Vec<Condition>, InvalidQuery> {
    let entries = match entries {
        None | Some(LegacyValue::Null) => return Ok(vec![]),
        Some(LegacyValue::List(entries)) => entries,
        Some(other) => return Err(InvalidQuery::shape(clause, "a list of conditions", other)),
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            LegacyValue::List(parts) | LegacyValue::Tuple(parts) => match parts.as_slice() {
                [lhs, LegacyValue::String(op), rhs] => build_condition(lhs, op, rhs),
                _ => Err(InvalidQuery::UnsupportedGrouping { clause, index }),
            },
            _ => Err(InvalidQuery::UnsupportedGrouping { clause, index }),
        })
        .collect()
}

fn build_condition(
    lhs: &LegacyValue,
    op: &str,
    rhs: &LegacyValue,
) -> Result<Condition, InvalidQuery> {
    let lhs = parse_exp(lhs)?;
    let op: Op = op.parse()?;
    let rhs = match parse_scalar(rhs)? {
        Scalar::Null => None,
        scalar => Some(scalar.into()),
    };
    Ok(Condition::new(lhs, op, rhs)?)
}

/// Accept a single value or a list of values.
fn one_or_many(value: &LegacyValue) -> &[LegacyValue] {
    match value {
        LegacyValue::List(items) => items,
        single => std::slice::from_ref(single),
    }
}

fn parse_date(field: &'static str, value: &LegacyValue) -> Result<Scalar, InvalidQuery> {
    value
        .as_str()
        .and_then(parse_datetime)
        .map(Scalar::DateTime)
        .ok_or_else(|| InvalidQuery::shape(field, "a YYYY-MM-DDTHH:MM:SS.ffffff date-time", value))
}

fn parse_sample(value: &LegacyValue) -> Result<Option<SampleRate>, InvalidQuery> {
    match value {
        LegacyValue::Null => Ok(None),
        LegacyValue::Int(n) if *n >= 0 => Ok(Some(SampleRate::Rows(*n as u64))),
        LegacyValue::Float(f) => Ok(Some(SampleRate::Fraction(*f))),
        other => Err(InvalidQuery::shape("sample", "a number", other)),
    }
}

fn parse_limitby(value: &LegacyValue) -> Result<LimitBy, InvalidQuery> {
    let expected = "a [count, column] pair";
    let (count, name) = match value {
        LegacyValue::List(parts) | LegacyValue::Tuple(parts) => match parts.as_slice() {
            [count, LegacyValue::String(name)] => (count, name),
            _ => return Err(InvalidQuery::shape("limitby", expected, value)),
        },
        other => return Err(InvalidQuery::shape("limitby", expected, other)),
    };

    let count = match count {
        LegacyValue::Int(n) => *n,
        LegacyValue::Float(f) => f.trunc() as i64,
        LegacyValue::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| InvalidQuery::shape("limitby", "an integer count", count))?,
        other => return Err(InvalidQuery::shape("limitby", "an integer count", other)),
    };
    if count <= 0 {
        return Err(InvalidExpression::InvalidLimitBy { count }.into());
    }

    Ok(LimitBy::new(Column::new(name.as_str()), count as u64)?)
}

// =============================================================================
// Body translation
// =============================================================================

/// Translate a legacy body into a query against `entity`, using default
/// settings.
pub fn json_to_snql(body: &Body, entity: &str) -> Result<Query, InvalidQuery> {
    json_to_snql_with(body, entity, &LegacySettings::default())
}

/// Translate a legacy body into a query against `entity`.
pub fn json_to_snql_with(
    body: &Body,
    entity: &str,
    settings: &LegacySettings,
) -> Result<Query, InvalidQuery> {
    let null = LegacyValue::Null;
    let field = |name: &str| body.get(name).unwrap_or(&null);

    let dataset = match field("dataset") {
        LegacyValue::Null => settings.default_dataset.clone(),
        LegacyValue::String(s) => s.clone(),
        other => return Err(InvalidQuery::shape("dataset", "a string", other)),
    };
    debug!(dataset = %dataset, entity, "translating legacy body");

    let mut target = Entity::new(entity);
    if let Some(sample) = parse_sample(field("sample"))? {
        target = target.with_sample(sample);
    }
    let mut query = Query::new(dataset, target);

    // SELECT: columns, then aggregations, then the array join
    let mut select = Vec::new();
    for name in ["selected_columns", "aggregations"] {
        match field(name) {
            LegacyValue::Null => {}
            LegacyValue::List(items) => {
                for item in items {
                    select.push(parse_exp(item)?);
                }
            }
            other => return Err(InvalidQuery::shape(name, "a list", other)),
        }
    }
    match field("arrayjoin") {
        LegacyValue::String(col) if !col.is_empty() => {
            select.push(
                Function::new(
                    "arrayJoin",
                    Some(vec![Column::new(col.as_str()).into()]),
                    Some(col.clone()),
                )
                .into(),
            );
        }
        other if other.is_truthy() => {
            return Err(InvalidQuery::shape("arrayjoin", "a column name", other))
        }
        _ => {}
    }
    query = query.set_select(select);

    let groupby = field("groupby");
    let groupby = if groupby.is_truthy() {
        one_or_many(groupby)
            .iter()
            .map(parse_exp)
            .collect::<Result<Vec<_>, _>>()?
    } else {
        vec![]
    };
    query = query.set_groupby(groupby);

    // WHERE: explicit conditions, then scope, then the time range
    let mut conditions = parse_conditions(body.get("conditions"), "conditions")?;

    for scope in &settings.scope {
        let column = Column::new(scope.column.as_str());
        let condition = match field(scope.field.as_str()) {
            LegacyValue::Int(id) => Some(Condition::binary(column, Op::Eq, Scalar::Int(*id))?),
            values @ (LegacyValue::List(_) | LegacyValue::Tuple(_)) => {
                Some(Condition::binary(column, Op::In, parse_scalar(values)?)?)
            }
            _ => None,
        };
        if let Some(condition) = condition {
            trace!(field = %scope.field, condition = %condition, "synthesized scope condition");
            conditions.push(condition);
        }
    }

    for (name, op) in [("from_date", Op::Gt), ("to_date", Op::Lte)] {
        let value = field(name);
        if value.is_truthy() {
            let bound = parse_date(name, value)?;
            let column = Column::new(settings.time_column.as_str());
            conditions.push(Condition::binary(column, op, bound)?);
        }
    }
    query = query.set_where(conditions);

    query = query.set_having(parse_conditions(body.get("having"), "having")?);

    let orderby = field("orderby");
    if orderby.is_truthy() {
        let mut order_bys = Vec::new();
        for entry in one_or_many(orderby) {
            let order_by = match entry {
                LegacyValue::String(name) if name.starts_with('-') => OrderBy::new(
                    parse_exp(&LegacyValue::String(name.trim_start_matches('-').into()))?,
                    Direction::Desc,
                ),
                other => OrderBy::new(parse_exp(other)?, Direction::Asc),
            };
            order_bys.push(order_by);
        }
        query = query.set_orderby(order_bys);
    }

    let limitby = field("limitby");
    if limitby.is_truthy() {
        query = query.set_limitby(parse_limitby(limitby)?);
    }

    for (name, apply) in PASSTHROUGH {
        let value = field(name);
        if !value.is_null() {
            query = apply(query, value)?;
        }
    }

    Ok(query)
}
