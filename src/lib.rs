//! # snql
//!
//! A typed builder for SnQL, the textual query language of an analytical
//! query backend, plus an adapter for the older JSON query body.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │              Legacy JSON body (LegacyValue)              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [legacy::json_to_snql]
//! ┌─────────────────────────────────────────────────────────┐
//! │     Expression model + validated Conditions + Query      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [to_tokens / Translation]
//! ┌─────────────────────────────────────────────────────────┐
//! │                    SnQL query text                       │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod legacy;
pub mod snql;

// Re-export SnQL submodules at crate level
pub use snql::condition;
pub use snql::expr;
pub use snql::query;
pub use snql::scalar;
pub use snql::token;
pub use snql::visitor;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::condition::{Condition, InvalidExpression, Op};
    pub use crate::expr::{
        // Constructors
        column,
        curried,
        function,
        lit,
        // Types
        Column,
        CurriedFunction,
        Expression,
        Function,
    };
    pub use crate::legacy::{json_to_snql, json_to_snql_with, Body, InvalidQuery, LegacyValue};
    pub use crate::query::{Direction, Entity, LimitBy, OrderBy, Query, SampleRate};
    pub use crate::scalar::Scalar;
    pub use crate::token::{Token, ToTokens, TokenStream};
    pub use crate::visitor::Translation;
}

// Also export at crate root for convenience
pub use legacy::{json_to_snql, InvalidQuery};
pub use query::Query;
pub use visitor::Translation;
