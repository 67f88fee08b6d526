//! # davstore-database
//!
//! PostgreSQL connection management, schema migrations and the repositories
//! for every table in the `cas` schema.
//!
//! Repositories never own a connection. Each function takes a
//! `&mut PgConnection`, so the service layer composes several of them inside
//! a single transaction.

pub mod bootstrap;
pub mod connection;
pub mod error;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use error::db_error;
