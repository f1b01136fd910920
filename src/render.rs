//! HTML pages for the two login outcomes.
//!
//! Templates live in `templates/`; askama escapes every interpolated value,
//! so a submitted username can never inject markup.

use askama::Template;
use axum::response::Html;

use crate::error::LoginError;
use crate::service::validator::LoginOutcome;

#[derive(Template)]
#[template(path = "welcome.html")]
struct WelcomePage<'a> {
    username: &'a str,
    entry_page: &'a str,
}

#[derive(Template)]
#[template(path = "login_failed.html")]
struct LoginFailedPage<'a> {
    entry_page: &'a str,
}

pub fn render_outcome(outcome: &LoginOutcome, entry_page: &str) -> Result<Html<String>, LoginError> {
    let body = match outcome {
        LoginOutcome::Matched { username } => WelcomePage {
            username,
            entry_page,
        }
        .render()?,
        LoginOutcome::NotMatched => LoginFailedPage { entry_page }.render()?,
    };
    Ok(Html(body))
}
