//! Order API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use shared::models::{OrderCreate, OrderSummary, PlacedOrder};

use crate::auth::{CurrentUser, OptionalUser};
use crate::core::ServerState;
use crate::orders::{TrackQuery, Tracked};
use crate::utils::{AppResult, Envelope, created, ok};

#[derive(Debug, Deserialize)]
pub struct TrackParams {
    pub number: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MyOrders {
    pub orders: Vec<OrderSummary>,
}

/// Checkout; signed-in customers get the order linked to their account
pub async fn create(
    State(state): State<ServerState>,
    OptionalUser(user): OptionalUser,
    Json(req): Json<OrderCreate>,
) -> AppResult<(StatusCode, Envelope<PlacedOrder>)> {
    let placed = state
        .ledger
        .place_order(
            &req,
            user.map(|u| u.id),
            &state.config.default_shipping_country,
        )
        .await?;
    Ok(created(placed, "Order created successfully"))
}

pub async fn list_mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Envelope<MyOrders>> {
    let orders = state.ledger.orders_for_user(user.id).await?;
    Ok(ok(MyOrders { orders }))
}

/// Guest tracking by order number (full detail) or email (summaries)
pub async fn track(
    State(state): State<ServerState>,
    Query(params): Query<TrackParams>,
) -> AppResult<Envelope<Tracked>> {
    let query = TrackQuery::from_params(params.number.as_deref(), params.email.as_deref())?;
    Ok(ok(state.ledger.track_order(&query).await?))
}
