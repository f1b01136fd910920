use axum::{
    Router,
    http::{Request, Response},
    routing::get,
};
use std::{sync::Arc, time::Duration};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::db::UsersStore;
use crate::handlers::login::{login_entry_redirect, login_handler};

pub const LOGIN_PATH: &str = "/login";

#[derive(Clone)]
pub struct LoginState {
    pub store: UsersStore,
    pub entry_page: Arc<str>,
}

impl LoginState {
    pub fn new(store: UsersStore, entry_page: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            entry_page: entry_page.into(),
        }
    }
}

pub fn login_router(state: LoginState) -> Router {
    Router::new()
        .route(LOGIN_PATH, get(login_entry_redirect).post(login_handler))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        uri = %req.uri(),
                        status = tracing::field::Empty,
                    )
                })
                .on_response(|res: &Response<_>, latency: Duration, span: &Span| {
                    let status = res.status();
                    span.record("status", tracing::field::display(status));
                    if status.is_server_error() {
                        tracing::error!(%status, ?latency, "response");
                    } else {
                        tracing::info!(%status, ?latency, "response");
                    }
                }),
        )
}
