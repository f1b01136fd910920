use sqlx::FromRow;

/// One row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub username: String,
    pub password: String,
}
