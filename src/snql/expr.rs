//! Expression AST - columns, function calls and literals.
//!
//! Every variant is handled in `to_tokens()` - the compiler enforces this.

use super::scalar::Scalar;
use super::token::{Token, ToTokens, TokenStream};

/// Suffix marking a pre-built zero-argument call, e.g. `count()`.
const NO_ARG_MARKER: &str = "()";

// =============================================================================
// Expression AST
// =============================================================================

/// Column reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    pub name: String,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Function call: `name(params...) AS alias`.
///
/// `parameters: None` means the call has no parameter list at all and the
/// name renders bare. This is how opaque pre-built calls such as
/// `apdex(duration, 300)` pass through. `Some(vec![])` renders `name()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub function: String,
    pub parameters: Option<Vec<Expression>>,
    pub alias: Option<String>,
}

impl Function {
    /// Build a function call.
    ///
    /// A name ending in `()` with no parameters collapses to a zero-argument
    /// call with the marker stripped: `count()` becomes `count` with an empty
    /// parameter list.
    pub fn new(
        function: impl Into<String>,
        parameters: Option<Vec<Expression>>,
        alias: Option<String>,
    ) -> Self {
        let function = function.into();
        let no_params = parameters.as_ref().map_or(true, Vec::is_empty);
        if no_params && function.ends_with(NO_ARG_MARKER) {
            return Self {
                function: function.trim_matches(|c| c == '(' || c == ')').to_string(),
                parameters: Some(vec![]),
                alias,
            };
        }
        Self {
            function,
            parameters,
            alias,
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// Two-stage call: `<function>(params...)`, where `function` is already a
/// serialized call such as `quantile(0.75)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CurriedFunction {
    pub function: String,
    pub parameters: Vec<Expression>,
    pub alias: Option<String>,
}

impl CurriedFunction {
    pub fn new(
        function: impl Into<String>,
        parameters: Vec<Expression>,
        alias: Option<String>,
    ) -> Self {
        Self {
            function: function.into(),
            parameters,
            alias,
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// A SnQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Column(Column),
    Function(Function),
    CurriedFunction(CurriedFunction),
    Scalar(Scalar),
}

impl Expression {
    /// Kind name used in validation errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::Column(_) => "Column",
            Expression::Function(_) => "Function",
            Expression::CurriedFunction(_) => "CurriedFunction",
            Expression::Scalar(s) => s.type_name(),
        }
    }

    /// True for columns and calls, the only kinds allowed on a condition LHS.
    pub fn is_reference(&self) -> bool {
        !matches!(self, Expression::Scalar(_))
    }
}

// =============================================================================
// Expression to Tokens
// =============================================================================

fn push_alias(ts: &mut TokenStream, alias: &Option<String>) {
    if let Some(alias) = alias {
        ts.space()
            .push(Token::As)
            .space()
            .push(Token::Ident(alias.clone()));
    }
}

impl ToTokens for Column {
    fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Ident(self.name.clone()));
        ts
    }
}

impl ToTokens for Function {
    fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::FunctionName(self.function.clone()));
        if let Some(params) = &self.parameters {
            ts.lparen();
            ts.comma_separated(params);
            ts.rparen();
        }
        push_alias(&mut ts, &self.alias);
        ts
    }
}

impl ToTokens for CurriedFunction {
    fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Raw(self.function.clone()));
        ts.lparen();
        ts.comma_separated(&self.parameters);
        ts.rparen();
        push_alias(&mut ts, &self.alias);
        ts
    }
}

impl ToTokens for Expression {
    fn to_tokens(&self) -> TokenStream {
        match self {
            Expression::Column(c) => c.to_tokens(),
            Expression::Function(f) => f.to_tokens(),
            Expression::CurriedFunction(f) => f.to_tokens(),
            Expression::Scalar(s) => s.to_tokens(),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<Column> for Expression {
    fn from(c: Column) -> Self {
        Expression::Column(c)
    }
}

impl From<Function> for Expression {
    fn from(f: Function) -> Self {
        Expression::Function(f)
    }
}

impl From<CurriedFunction> for Expression {
    fn from(f: CurriedFunction) -> Self {
        Expression::CurriedFunction(f)
    }
}

impl From<Scalar> for Expression {
    fn from(s: Scalar) -> Self {
        Expression::Scalar(s)
    }
}

// =============================================================================
// Expression Constructors
// =============================================================================

/// Create a column reference.
pub fn column(name: &str) -> Expression {
    Expression::Column(Column::new(name))
}

/// Create a function call with a parameter list.
pub fn function(name: &str, parameters: Vec<Expression>) -> Expression {
    Expression::Function(Function::new(name, Some(parameters), None))
}

/// Create a curried call `first(params...)`.
pub fn curried(first: &str, parameters: Vec<Expression>) -> Expression {
    Expression::CurriedFunction(CurriedFunction::new(first, parameters, None))
}

/// Create a literal.
pub fn lit(value: impl Into<Scalar>) -> Expression {
    Expression::Scalar(value.into())
}
