//! Conditions: validated `lhs op rhs` triples used by WHERE and HAVING.

use std::fmt;
use std::str::FromStr;

use super::expr::Expression;
use super::token::{Token, ToTokens, TokenStream};

/// Validation error raised when building an expression node.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidExpression {
    #[error("invalid condition: unary operator {op} doesn't take an rhs")]
    UnexpectedRhs { op: Op },

    #[error("invalid condition: binary operator {op} requires an rhs")]
    MissingRhs { op: Op },

    #[error(
        "invalid condition: LHS of a condition must be a Column, CurriedFunction or Function, not {found}"
    )]
    WrongLhsKind { found: &'static str },

    #[error("invalid condition: RHS of a condition must be a Column, CurriedFunction, Function or Scalar, not {found}")]
    WrongRhsKind { found: &'static str },

    #[error("invalid condition: unknown operator '{found}'")]
    WrongOperatorKind { found: String },

    #[error("invalid limitby: count must be positive, got {count}")]
    InvalidLimitBy { count: i64 },
}

/// Condition operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    NotIn,
    Like,
    NotLike,
    IsNull,
    IsNotNull,
}

impl Op {
    pub const ALL: [Op; 12] = [
        Op::Eq,
        Op::Neq,
        Op::Gt,
        Op::Gte,
        Op::Lt,
        Op::Lte,
        Op::In,
        Op::NotIn,
        Op::Like,
        Op::NotLike,
        Op::IsNull,
        Op::IsNotNull,
    ];

    /// Unary operators take no rhs.
    pub fn is_unary(self) -> bool {
        matches!(self, Op::IsNull | Op::IsNotNull)
    }

    pub fn token(self) -> Token {
        match self {
            Op::Eq => Token::Eq,
            Op::Neq => Token::Ne,
            Op::Gt => Token::Gt,
            Op::Gte => Token::Gte,
            Op::Lt => Token::Lt,
            Op::Lte => Token::Lte,
            Op::In => Token::In,
            Op::NotIn => Token::NotIn,
            Op::Like => Token::Like,
            Op::NotLike => Token::NotLike,
            Op::IsNull => Token::IsNull,
            Op::IsNotNull => Token::IsNotNull,
        }
    }

    /// Operator text as it appears in a query.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Neq => "!=",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lt => "<",
            Op::Lte => "<=",
            Op::In => "IN",
            Op::NotIn => "NOT IN",
            Op::Like => "LIKE",
            Op::NotLike => "NOT LIKE",
            Op::IsNull => "IS NULL",
            Op::IsNotNull => "IS NOT NULL",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Op {
    type Err = InvalidExpression;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Op::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| InvalidExpression::WrongOperatorKind { found: s.into() })
    }
}

/// A validated condition.
///
/// Fields are private so every instance has passed [`Condition::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    lhs: Expression,
    op: Op,
    rhs: Option<Expression>,
}

impl Condition {
    /// Build a condition, checking operand kinds and operator arity.
    pub fn new(
        lhs: impl Into<Expression>,
        op: Op,
        rhs: Option<Expression>,
    ) -> Result<Self, InvalidExpression> {
        let lhs = lhs.into();
        if !lhs.is_reference() {
            return Err(InvalidExpression::WrongLhsKind {
                found: lhs.kind_name(),
            });
        }

        match (op.is_unary(), &rhs) {
            (true, Some(_)) => return Err(InvalidExpression::UnexpectedRhs { op }),
            (false, None) => return Err(InvalidExpression::MissingRhs { op }),
            _ => {}
        }

        Ok(Self { lhs, op, rhs })
    }

    /// `lhs op rhs` for a binary operator.
    pub fn binary(
        lhs: impl Into<Expression>,
        op: Op,
        rhs: impl Into<Expression>,
    ) -> Result<Self, InvalidExpression> {
        Self::new(lhs, op, Some(rhs.into()))
    }

    /// `lhs op` for a unary operator.
    pub fn unary(lhs: impl Into<Expression>, op: Op) -> Result<Self, InvalidExpression> {
        Self::new(lhs, op, None)
    }

    pub fn lhs(&self) -> &Expression {
        &self.lhs
    }

    pub fn op(&self) -> Op {
        self.op
    }

    pub fn rhs(&self) -> Option<&Expression> {
        self.rhs.as_ref()
    }
}

impl ToTokens for Condition {
    fn to_tokens(&self) -> TokenStream {
        let mut ts = self.lhs.to_tokens();
        ts.space().push(self.op.token());
        if let Some(rhs) = &self.rhs {
            ts.space().append(&rhs.to_tokens());
        }
        ts
    }
}

/// A conjunction renders each condition joined by ` AND `.
impl ToTokens for [Condition] {
    fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.join(self, &[Token::Space, Token::And, Token::Space]);
        ts
    }
}
