//! Database module: the single-file SQLite credential store.
//!
//! Layout:
//! - `models.rs`: row struct for `users`
//! - `schema.rs`: DDL and seed record
//! - `sqlite.rs`: store initialization and credential lookup

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::DbUser;
pub use schema::{SEED_PASSWORD, SEED_USERNAME, USERS_INIT};
pub use sqlite::{UsersStore, initialize};
