//! HTTP API
//!
//! - [`health`] - liveness and database check
//! - [`products`] - public catalog
//! - [`auth`] - register, login, token checks
//! - [`cart`] - per-user cart
//! - [`orders`] - checkout, order history, tracking
//! - [`admin`] - order, product and account management

pub mod admin;
pub mod auth;
pub mod cart;
pub mod health;
pub mod orders;
pub mod products;

use axum::Router;

use crate::core::ServerState;

/// All routes: `/health` plus everything under `/api/v1`
pub fn router(state: &ServerState) -> Router<ServerState> {
    let v1 = Router::new()
        .merge(products::router())
        .merge(auth::router())
        .merge(cart::router())
        .merge(orders::router())
        .merge(admin::router(state));

    Router::new().merge(health::router()).nest("/api/v1", v1)
}
