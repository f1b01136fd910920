use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, info};

use crate::middleware::login_form::LoginSubmission;
use crate::render::render_outcome;
use crate::service::validator::validate;
use crate::{LoginError, router::LoginState};

/// POST /login -> redirect on missing input, otherwise a result page.
pub async fn login_handler(
    State(state): State<LoginState>,
    LoginSubmission(creds): LoginSubmission,
) -> Result<Response, LoginError> {
    let Some(creds) = creds else {
        debug!("missing username or password; redirecting to entry page");
        return Ok(Redirect::to(&state.entry_page).into_response());
    };

    let outcome = validate(&state.store, &creds).await?;
    debug!(username = creds.username(), "login attempt evaluated");
    info!(matched = outcome.is_matched(), "login attempt");

    Ok(render_outcome(&outcome, &state.entry_page)?.into_response())
}

/// GET /login -> nothing was posted, send the browser to the form.
pub async fn login_entry_redirect(State(state): State<LoginState>) -> Redirect {
    Redirect::to(&state.entry_page)
}
