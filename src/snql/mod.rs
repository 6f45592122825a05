//! SnQL generation module.
//!
//! This module provides a typed query model that renders to the backend's
//! SnQL text. It includes:
//!
//! - [`scalar`] - literal values and coercion
//! - [`expr`] - columns, function calls and curried calls
//! - [`condition`] - operators and validated conditions
//! - [`query`] - ordering, limiting and the query aggregate
//! - [`token`] - token types for SnQL generation
//! - [`visitor`] - the translation visitor

pub mod condition;
pub mod expr;
pub mod query;
pub mod scalar;
pub mod token;
pub mod visitor;

// Re-export commonly used types at the snql module level
pub use condition::{Condition, InvalidExpression, Op};
pub use expr::{column, curried, function, lit, Column, CurriedFunction, Expression, Function};
pub use query::{Direction, Entity, LimitBy, OrderBy, Query, SampleRate};
pub use scalar::Scalar;
pub use token::{Token, ToTokens, TokenStream};
pub use visitor::Translation;
