//! Auth routes
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /auth/register | POST | none |
//! | /auth/login | POST | none |
//! | /auth/logout | POST | none (advisory) |
//! | /auth/check | GET | optional token, claims only |
//! | /auth/me | GET | token, user record re-read |
//!
//! Tokens are stateless: logout only tells the client to drop its token,
//! which stays valid until it expires.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
        .route("/logout", post(handler::logout))
        .route("/check", get(handler::check))
        .route("/me", get(handler::me))
}
