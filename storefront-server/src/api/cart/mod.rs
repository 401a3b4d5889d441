//! Cart routes (token required, claims only)
//!
//! | Path | Method |
//! |------|--------|
//! | /cart | GET, POST, PUT |
//! | /cart?id= | DELETE |
//! | /cart/clear | DELETE |

mod handler;

use axum::{
    Router,
    routing::{delete, get},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/",
            get(handler::summary)
                .post(handler::add)
                .put(handler::update)
                .delete(handler::remove),
        )
        .route("/clear", delete(handler::clear))
}
