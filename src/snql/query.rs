//! Query builder - assemble SnQL clauses with setter-style mutators.

use std::fmt;

use super::condition::{Condition, InvalidExpression};
use super::expr::{Column, Expression};
use super::token::{Token, ToTokens, TokenStream};

/// Decimals used when a fractional sample rate is printed.
const SAMPLE_PRECISION: usize = 6;

// =============================================================================
// ORDER BY
// =============================================================================

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// An ORDER BY expression.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct OrderBy {
    pub exp: Expression,
    pub direction: Direction,
}

impl OrderBy {
    pub fn new(exp: impl Into<Expression>, direction: Direction) -> Self {
        Self {
            exp: exp.into(),
            direction,
        }
    }

    pub fn asc(exp: impl Into<Expression>) -> Self {
        Self::new(exp, Direction::Asc)
    }

    pub fn desc(exp: impl Into<Expression>) -> Self {
        Self::new(exp, Direction::Desc)
    }
}

impl ToTokens for OrderBy {
    fn to_tokens(&self) -> TokenStream {
        let mut ts = self.exp.to_tokens();
        ts.space().push(match self.direction {
            Direction::Asc => Token::Asc,
            Direction::Desc => Token::Desc,
        });
        ts
    }
}

impl ToTokens for [OrderBy] {
    fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.comma_separated(self);
        ts
    }
}

// =============================================================================
// LIMIT BY
// =============================================================================

/// `LIMIT n BY column`.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitBy {
    column: Column,
    count: u64,
}

impl LimitBy {
    /// Build a LIMIT BY; the count must be positive.
    pub fn new(column: Column, count: u64) -> Result<Self, InvalidExpression> {
        if count == 0 {
            return Err(InvalidExpression::InvalidLimitBy { count: 0 });
        }
        Ok(Self { column, count })
    }

    pub fn column(&self) -> &Column {
        &self.column
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

impl ToTokens for LimitBy {
    fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Limit)
            .space()
            .push(Token::LitUint(self.count))
            .space()
            .push(Token::By)
            .space()
            .append(&self.column.to_tokens());
        ts
    }
}

// =============================================================================
// MATCH target
// =============================================================================

/// Sampling hint on the MATCH clause.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleRate {
    /// Fraction of rows, printed with six decimals
    Fraction(f64),
    /// Absolute row count, printed as an integer
    Rows(u64),
}

impl ToTokens for SampleRate {
    fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(match self {
            SampleRate::Fraction(f) => Token::LitFixed {
                value: *f,
                precision: SAMPLE_PRECISION,
            },
            SampleRate::Rows(n) => Token::LitUint(*n),
        });
        ts
    }
}

/// The entity a query targets, with an optional sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub name: String,
    pub sample: Option<SampleRate>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sample: None,
        }
    }

    pub fn with_sample(mut self, sample: SampleRate) -> Self {
        self.sample = Some(sample);
        self
    }
}

impl ToTokens for Entity {
    fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Ident(self.name.clone()));
        if let Some(sample) = &self.sample {
            ts.space()
                .push(Token::Sample)
                .space()
                .append(&sample.to_tokens());
        }
        ts
    }
}

// =============================================================================
// Query
// =============================================================================

/// A SnQL query.
///
/// Setters consume the query and return the updated value, so a built query
/// is never mutated behind a caller's back.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "Query has no effect until printed with print()"]
pub struct Query {
    pub dataset: String,
    pub entity: Entity,
    pub select: Vec<Expression>,
    pub groupby: Vec<Expression>,
    pub where_clause: Vec<Condition>,
    pub having: Vec<Condition>,
    pub orderby: Vec<OrderBy>,
    pub limitby: Option<LimitBy>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub granularity: Option<u64>,
    pub totals: Option<bool>,
    pub consistent: Option<bool>,
    pub turbo: Option<bool>,
    pub debug: Option<bool>,
}

impl Query {
    pub fn new(dataset: impl Into<String>, entity: Entity) -> Self {
        Self {
            dataset: dataset.into(),
            entity,
            select: vec![],
            groupby: vec![],
            where_clause: vec![],
            having: vec![],
            orderby: vec![],
            limitby: None,
            limit: None,
            offset: None,
            granularity: None,
            totals: None,
            consistent: None,
            turbo: None,
            debug: None,
        }
    }

    pub fn set_select(mut self, select: Vec<Expression>) -> Self {
        self.select = select;
        self
    }

    pub fn set_groupby(mut self, groupby: Vec<Expression>) -> Self {
        self.groupby = groupby;
        self
    }

    pub fn set_where(mut self, conditions: Vec<Condition>) -> Self {
        self.where_clause = conditions;
        self
    }

    pub fn set_having(mut self, conditions: Vec<Condition>) -> Self {
        self.having = conditions;
        self
    }

    pub fn set_orderby(mut self, orderby: Vec<OrderBy>) -> Self {
        self.orderby = orderby;
        self
    }

    pub fn set_limitby(mut self, limitby: LimitBy) -> Self {
        self.limitby = Some(limitby);
        self
    }

    pub fn set_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn set_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn set_granularity(mut self, granularity: u64) -> Self {
        self.granularity = Some(granularity);
        self
    }

    pub fn set_totals(mut self, totals: bool) -> Self {
        self.totals = Some(totals);
        self
    }

    pub fn set_consistent(mut self, consistent: bool) -> Self {
        self.consistent = Some(consistent);
        self
    }

    pub fn set_turbo(mut self, turbo: bool) -> Self {
        self.turbo = Some(turbo);
        self
    }

    pub fn set_debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    pub fn set_sample(mut self, sample: SampleRate) -> Self {
        self.entity.sample = Some(sample);
        self
    }

    /// Render the query text, one clause per line.
    pub fn print(&self) -> String {
        self.to_tokens().serialize()
    }

    /// Lower each present clause to its own line.
    fn lines(&self) -> Vec<TokenStream> {
        let mut lines = Vec::new();

        let mut dataset = TokenStream::new();
        dataset
            .push(Token::Comment("DATASET".into()))
            .push(Token::Colon)
            .space()
            .push(Token::Ident(self.dataset.clone()));
        lines.push(dataset);

        for (label, flag) in [
            ("CONSISTENT", self.consistent),
            ("TURBO", self.turbo),
            ("DEBUG", self.debug),
        ] {
            if flag == Some(true) {
                let mut ts = TokenStream::new();
                ts.push(Token::Comment(label.into()))
                    .push(Token::Colon)
                    .space()
                    .push(Token::LitBool(true));
                lines.push(ts);
            }
        }

        let mut match_clause = TokenStream::new();
        match_clause
            .push(Token::Match)
            .space()
            .lparen()
            .append(&self.entity.to_tokens())
            .rparen();
        lines.push(match_clause);

        if !self.select.is_empty() {
            let mut ts = TokenStream::new();
            ts.push(Token::Select).space().comma_separated(&self.select);
            lines.push(ts);
        }

        if !self.groupby.is_empty() {
            let mut ts = TokenStream::new();
            ts.push(Token::By).space().comma_separated(&self.groupby);
            lines.push(ts);
        }

        if !self.where_clause.is_empty() {
            let mut ts = TokenStream::new();
            ts.push(Token::Where)
                .space()
                .append(&self.where_clause.as_slice().to_tokens());
            lines.push(ts);
        }

        if !self.having.is_empty() {
            let mut ts = TokenStream::new();
            ts.push(Token::Having)
                .space()
                .append(&self.having.as_slice().to_tokens());
            lines.push(ts);
        }

        if !self.orderby.is_empty() {
            let mut ts = TokenStream::new();
            ts.push(Token::OrderBy)
                .space()
                .append(&self.orderby.as_slice().to_tokens());
            lines.push(ts);
        }

        if let Some(limitby) = &self.limitby {
            lines.push(limitby.to_tokens());
        }

        for (keyword, value) in [
            (Token::Limit, self.limit),
            (Token::Offset, self.offset),
            (Token::Granularity, self.granularity),
        ] {
            if let Some(n) = value {
                let mut ts = TokenStream::new();
                ts.push(keyword).space().push(Token::LitUint(n));
                lines.push(ts);
            }
        }

        if let Some(totals) = self.totals {
            let mut ts = TokenStream::new();
            ts.push(Token::Totals).space().push(Token::LitBool(totals));
            lines.push(ts);
        }

        lines
    }
}

impl ToTokens for Query {
    fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        for (i, line) in self.lines().iter().enumerate() {
            if i > 0 {
                ts.newline();
            }
            ts.append(line);
        }
        ts
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.print())
    }
}
