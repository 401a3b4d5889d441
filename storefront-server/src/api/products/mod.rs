//! Public catalog
//!
//! | Path | Method |
//! |------|--------|
//! | /products?page&limit&search&category&subcategory&featured&popular&new | GET |
//! | /products/featured?limit | GET |
//! | /products/popular?limit | GET |
//! | /products/new?limit | GET |
//! | /products/{id} | GET |
//! | /products/slug/{slug} | GET |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/products", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/featured", get(handler::featured))
        .route("/popular", get(handler::popular))
        .route("/new", get(handler::new_arrivals))
        .route("/slug/{slug}", get(handler::get_by_slug))
        .route("/{id}", get(handler::get_by_id))
}
