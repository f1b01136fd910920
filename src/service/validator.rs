use crate::db::UsersStore;
use crate::error::LoginError;
use tracing::debug;

/// A username/password pair that passed the non-empty check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Trim both fields. Absent or blank values yield `None`.
    pub fn from_submission(username: Option<&str>, password: Option<&str>) -> Option<Self> {
        let username = username.map(str::trim).unwrap_or_default();
        let password = password.map(str::trim).unwrap_or_default();
        if username.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Result of checking a pair against the store. Unknown user and wrong
/// password are deliberately the same variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Matched { username: String },
    NotMatched,
}

impl LoginOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

pub async fn validate(store: &UsersStore, creds: &Credentials) -> Result<LoginOutcome, LoginError> {
    store.ensure_initialized().await?;

    let row = store
        .find_by_credentials(&creds.username, &creds.password)
        .await?;

    Ok(match row {
        Some(user) => {
            debug!(user_id = user.id, "credentials matched");
            LoginOutcome::Matched {
                username: creds.username.clone(),
            }
        }
        None => LoginOutcome::NotMatched,
    })
}
