//! The translation visitor: one entry point that renders any node to SnQL.

use std::fmt;

use super::condition::Condition;
use super::expr::{Column, CurriedFunction, Expression, Function};
use super::query::{Entity, LimitBy, OrderBy};
use super::scalar::Scalar;
use super::token::ToTokens;

/// Renders expressions, conditions and clauses to their canonical text.
///
/// ```
/// use snql::snql::condition::{Condition, Op};
/// use snql::snql::expr::{column, lit};
/// use snql::snql::visitor::Translation;
///
/// let cond = Condition::binary(column("event_id"), Op::Eq, lit("foo")).unwrap();
/// assert_eq!(Translation.visit(&cond), "event_id = 'foo'");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Translation;

impl Translation {
    pub fn visit<N: ToTokens + ?Sized>(&self, node: &N) -> String {
        node.to_tokens().serialize()
    }
}

macro_rules! display_via_translation {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&Translation.visit(self))
                }
            }
        )*
    };
}

display_via_translation!(
    Column,
    Function,
    CurriedFunction,
    Expression,
    Scalar,
    Condition,
    OrderBy,
    LimitBy,
    Entity,
);
