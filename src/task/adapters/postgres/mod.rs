//! `PostgreSQL` adapter for task storage.

mod models;
mod schema;
mod store;

pub use store::{PostgresTaskStore, TaskPgPool};
