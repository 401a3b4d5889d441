//! Admin routes
//!
//! Every route except `/admin/login` sits behind [`require_admin`]: the token
//! is verified and the user record re-read, so a demoted or disabled admin
//! loses access at once.
//!
//! | Path | Method |
//! |------|--------|
//! | /admin/login | POST |
//! | /admin/check | GET |
//! | /admin/categories | GET, POST |
//! | /admin/categories/{id}/subcategories | POST |
//! | /admin/orders | GET |
//! | /admin/orders/stats | GET |
//! | /admin/orders/{id}/status | PUT |
//! | /admin/products | GET, POST |
//! | /admin/products/{id} | PUT, DELETE |
//! | /admin/users | GET |
//! | /admin/users/admins | GET, POST |
//! | /admin/users/admins/{id} | DELETE |
//! | /admin/users/admins/{id}/password | PUT |

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .route("/admin/login", post(handler::login))
        .nest(
            "/admin",
            routes().layer(middleware::from_fn_with_state(state.clone(), require_admin)),
        )
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/check", get(handler::check))
        // Orders
        .route("/orders", get(handler::list_orders))
        .route("/orders/stats", get(handler::order_stats))
        .route("/orders/{id}/status", put(handler::update_order_status))
        // Categories
        .route(
            "/categories",
            get(handler::list_categories).post(handler::create_category),
        )
        .route(
            "/categories/{id}/subcategories",
            post(handler::create_subcategory),
        )
        // Products
        .route(
            "/products",
            get(handler::list_products).post(handler::create_product),
        )
        .route(
            "/products/{id}",
            put(handler::update_product).delete(handler::delete_product),
        )
        // Accounts
        .route("/users", get(handler::list_customers))
        .route(
            "/users/admins",
            get(handler::list_admins).post(handler::create_admin),
        )
        .route("/users/admins/{id}", delete(handler::delete_admin))
        .route(
            "/users/admins/{id}/password",
            put(handler::reset_admin_password),
        )
}
