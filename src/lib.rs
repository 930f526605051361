//! Microblog GraphQL API
//!
//! A CRUD GraphQL API over a relational store: users own posts, and each post
//! carries one structured content value (text, image or link) validated on
//! input and persisted as a single serialized column.
//!
//! # Modules
//!
//! - `content`: the content model (variant registry, validation, storage
//!   codec, derived fields)
//! - `db`: database access layer and repositories
//! - `schema`: GraphQL types and resolvers
//! - `error`: error types and handling
//! - `config`: configuration management

pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod schema;

pub use config::Config;
pub use error::{AppError, Result};
