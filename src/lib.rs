//! Q&A platform backend.
//!
//! The interesting part of this crate is the [`search`] module: a free-text
//! query language (tags, strict phrases, score ranges, user filters, date
//! ranges, boolean predicates) parsed from a single string and compiled into
//! a composable query against the platform store. Everything else is the
//! plumbing that makes that searchable data exist: entity models, a storage
//! trait with an in-memory implementation, and a thin HTTP API.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod store;
