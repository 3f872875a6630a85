//! # TaskGate Shared Library
//!
//! Domain core of the TaskGate project/task management service: entities,
//! storage, credentials, the authorization policy and every query and
//! mutation the API exposes.
//!
//! ## Module Organization
//!
//! - `models`: Entity types and their PostgreSQL CRUD
//! - `store`: Storage trait with Postgres and in-memory backends
//! - `db`: Connection pooling and migrations
//! - `auth`: Passwords, tokens, identity resolution and role policy
//! - `validation`: Declarative input validation and typed inputs
//! - `ops`: Domain operations
//! - `relations`: Embedding related entities into responses
//! - `error`: Domain error kinds

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod ops;
pub mod relations;
pub mod store;
pub mod validation;

/// Current version of the TaskGate shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
