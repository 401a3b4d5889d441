//! Order routes
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /orders | POST | optional token (guest checkout) |
//! | /orders | GET | token |
//! | /orders/track?number=\|email= | GET | none |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create).get(handler::list_mine))
        .route("/track", get(handler::track))
}
