//! The structured search query compiler.
//!
//! A free-text query string like
//!
//! ```text
//! [python] -[django] title:"decorators" score:5..20 user:3 created:2023 hasaccepted:true caching
//! ```
//!
//! is compiled into a filter over the question store in four stages:
//!
//! 1. **Tokenizer** — six independent regex matchers extract typed fragments
//!    (tags, strict phrases, score ranges, user ids, date ranges, booleans);
//!    whatever none of them claimed is the plain-text remainder.
//! 2. **Condition builders** — one pure function per fragment kind turns a
//!    fragment list into predicates over candidate rows, including the
//!    derived vote-difference aggregate.
//! 3. **Query builder** — starts from the store's base select (questions
//!    joined with author, tags, answers and vote difference) and chains
//!    condition groups onto it, AND across groups.
//! 4. **Executor** — evaluates the compiled query, deduplicates joined rows
//!    and maps them to result records.
//!
//! The whole pipeline is rebuilt per call; nothing is cached between
//! searches. The only client-visible failure is a date fragment that fits
//! the grammar but parses under none of `YYYY-MM-DD`, `YYYY-MM`, `YYYY`.

mod builder;
mod conditions;
mod error;
mod executor;
mod service;
mod tokenizer;

pub use builder::{CompiledSearch, SearchQueryBuilder};
pub use conditions::Condition;
pub use error::{SearchError, SearchResult};
pub use executor::{SearchExecutor, SearchHit, UserSummary};
pub use service::SearchService;
pub use tokenizer::{
    BoolField, BoolToken, DateField, DateToken, QueryTokenizer, ScoreToken, StrictField,
    StrictToken, TagToken, TokenizedQuery,
};
