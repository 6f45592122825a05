//! SnQL Tokens - the atomic units of query output.
//!
//! Every renderable node lowers to a [`TokenStream`]; the stream is the only
//! place that knows how a token is spelled.

use chrono::{NaiveDateTime, Timelike};

/// SnQL Token - every possible element in a SnQL query.
///
/// Adding a new variant here will cause compile errors everywhere
/// it needs to be handled (exhaustive matching).
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Clause Keywords ===
    Match,
    Sample,
    Select,
    By,
    Where,
    Having,
    OrderBy,
    Limit,
    Offset,
    Granularity,
    Totals,

    // === Keywords ===
    As,
    And,
    Asc,
    Desc,

    // === Condition Operators ===
    Eq,
    Ne,
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

    // === Punctuation ===
    Comma,
    Colon,
    LParen,
    RParen,

    // === Whitespace / Formatting ===
    Space,
    Newline,

    // === Dynamic Content ===
    /// `-- LABEL` comment header; the value follows as separate tokens.
    Comment(String),
    /// Column, entity, dataset or alias name, emitted bare
    Ident(String),
    /// Function name, emitted as-is (SnQL function names are case sensitive)
    FunctionName(String),
    /// Integer literal
    LitInt(i64),
    /// Unsigned integer literal (limits, counts, row samples)
    LitUint(u64),
    /// Float literal, shortest round-trip form
    LitFloat(f64),
    /// Float literal with a fixed number of decimals
    LitFixed { value: f64, precision: usize },
    /// String literal
    LitString(String),
    /// Boolean literal
    LitBool(bool),
    /// NULL literal
    LitNull,
    /// Date-time literal, wrapped in `toDateTime(...)`
    LitDateTime(NaiveDateTime),

    // === Escape Hatch ===
    /// Pre-serialized text passed directly to output.
    ///
    /// Used for the opaque first stage of a curried call such as
    /// `quantile(0.75)`.
    Raw(String),
}

impl Token {
    /// Serialize this token to its SnQL text.
    pub fn serialize(&self) -> String {
        match self {
            // Clause keywords
            Token::Match => "MATCH".into(),
            Token::Sample => "SAMPLE".into(),
            Token::Select => "SELECT".into(),
            Token::By => "BY".into(),
            Token::Where => "WHERE".into(),
            Token::Having => "HAVING".into(),
            Token::OrderBy => "ORDER BY".into(),
            Token::Limit => "LIMIT".into(),
            Token::Offset => "OFFSET".into(),
            Token::Granularity => "GRANULARITY".into(),
            Token::Totals => "TOTALS".into(),

            // Keywords
            Token::As => "AS".into(),
            Token::And => "AND".into(),
            Token::Asc => "ASC".into(),
            Token::Desc => "DESC".into(),

            // Operators
            Token::Eq => "=".into(),
            Token::Ne => "!=".into(),
            Token::Gt => ">".into(),
            Token::Gte => ">=".into(),
            Token::Lt => "<".into(),
            Token::Lte => "<=".into(),
            Token::In => "IN".into(),
            Token::NotIn => "NOT IN".into(),
            Token::Like => "LIKE".into(),
            Token::NotLike => "NOT LIKE".into(),
            Token::IsNull => "IS NULL".into(),
            Token::IsNotNull => "IS NOT NULL".into(),

            // Punctuation
            Token::Comma => ",".into(),
            Token::Colon => ":".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),

            // Whitespace
            Token::Space => " ".into(),
            Token::Newline => "\n".into(),

            // Dynamic
            Token::Comment(label) => format!("-- {}", label),
            Token::Ident(name) => name.clone(),
            Token::FunctionName(name) => name.clone(),
            Token::LitInt(n) => n.to_string(),
            Token::LitUint(n) => n.to_string(),
            Token::LitFloat(f) => format_float(*f),
            Token::LitFixed { value, precision } => {
                if value.is_finite() {
                    format!("{:.*}", precision, value)
                } else {
                    format_float(*value)
                }
            }
            Token::LitString(s) => quote_string(s),
            Token::LitBool(b) => if *b { "True" } else { "False" }.into(),
            Token::LitNull => "NULL".into(),
            Token::LitDateTime(dt) => format!("toDateTime('{}')", format_datetime(dt)),

            // Escape hatch
            Token::Raw(s) => s.clone(),
        }
    }
}

/// Quote a string literal.
///
/// Backslashes and single quotes are escaped with a backslash, which is how
/// the backend's lexer reads them.
pub fn quote_string(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('\'');
    for c in s.chars() {
        if c == '\\' || c == '\'' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

/// Format a float the way the backend parses it back.
///
/// Non-finite values use the backend's `nan`/`inf` literals.
fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".into();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.into();
    }
    // Use ryu for fast, accurate float formatting
    let mut buffer = ryu::Buffer::new();
    buffer.format(f).to_string()
}

/// ISO-8601 text for a date-time, microseconds omitted when zero.
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    if dt.nanosecond() == 0 {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

/// A node that lowers to tokens.
///
/// Implemented by every expression, condition and clause type; the
/// [`Translation`](super::visitor::Translation) visitor is the single entry
/// point that turns any of them into text.
pub trait ToTokens {
    fn to_tokens(&self) -> TokenStream;
}

/// A stream of tokens that can be serialized to SnQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty token stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    /// Push a single token.
    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Extend with multiple tokens.
    pub fn extend(&mut self, tokens: impl IntoIterator<Item = Token>) -> &mut Self {
        self.tokens.extend(tokens);
        self
    }

    /// Append another token stream.
    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    /// Append each item's tokens, separated by `sep`.
    pub fn join<'a, T, I>(&mut self, items: I, sep: &[Token]) -> &mut Self
    where
        T: ToTokens + 'a + ?Sized,
        I: IntoIterator<Item = &'a T>,
    {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.extend(sep.iter().cloned());
            }
            self.append(&item.to_tokens());
        }
        self
    }

    /// Append items separated by `, `.
    pub fn comma_separated<'a, T, I>(&mut self, items: I) -> &mut Self
    where
        T: ToTokens + 'a + ?Sized,
        I: IntoIterator<Item = &'a T>,
    {
        self.join(items, &[Token::Comma, Token::Space])
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Serialize all tokens to a SnQL string.
    pub fn serialize(&self) -> String {
        self.tokens.iter().map(Token::serialize).collect()
    }

    // Convenience methods for common tokens
    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn newline(&mut self) -> &mut Self {
        self.push(Token::Newline)
    }
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
}
