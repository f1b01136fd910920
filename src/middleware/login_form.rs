use axum::{
    Form,
    extract::{FromRequest, Request},
};
use serde::Deserialize;
use std::convert::Infallible;
use tracing::debug;

use crate::service::validator::Credentials;

/// Raw urlencoded login body. Both fields may be absent.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Extracts the submitted credentials. `None` means the submission was
/// missing, blank, or not a form at all; callers redirect in that case.
pub struct LoginSubmission(pub Option<Credentials>);

impl<S> FromRequest<S> for LoginSubmission
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let form = match Form::<LoginForm>::from_request(req, state).await {
            Ok(Form(form)) => form,
            Err(rejection) => {
                debug!(reason = %rejection, "unreadable login form; treating as empty");
                LoginForm::default()
            }
        };

        Ok(LoginSubmission(Credentials::from_submission(
            form.username.as_deref(),
            form.password.as_deref(),
        )))
    }
}
