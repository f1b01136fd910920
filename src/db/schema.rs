//! SQL for creating the credential store.

/// Single `users` table:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT
/// - `username` UNIQUE, NOT NULL
/// - `password` plain text, NOT NULL
pub const USERS_INIT: &str = r#"
CREATE TABLE users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT UNIQUE NOT NULL,
    password TEXT NOT NULL
)
"#;

pub const SEED_USERNAME: &str = "admin";
pub const SEED_PASSWORD: &str = "1234";

pub const SEED_INSERT: &str = "INSERT INTO users (username, password) VALUES (?, ?)";
