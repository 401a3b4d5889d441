//! Cart API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use http::StatusCode;
use serde::Deserialize;
use shared::models::{CartAdd, CartItem, CartSummary, CartUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult, Envelope, ErrorCode, created, ok};

#[derive(Debug, Deserialize)]
pub struct RemoveQuery {
    pub id: Option<i64>,
}

fn required(field: &str) -> AppError {
    AppError::with_message(ErrorCode::RequiredField, format!("{field} is required"))
        .with_detail("field", field)
}

pub async fn summary(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Envelope<CartSummary>> {
    Ok(ok(state.cart.summary(user.id).await?))
}

pub async fn add(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<CartAdd>,
) -> AppResult<(StatusCode, Envelope<CartItem>)> {
    let product_id = req.product_id.ok_or_else(|| required("product_id"))?;
    let quantity = req.quantity.unwrap_or(1);
    let item = state.cart.add_item(user.id, product_id, quantity).await?;
    Ok(created(item, "Item added to cart"))
}

pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<CartUpdate>,
) -> AppResult<Json<ApiResponse<()>>> {
    let cart_id = req.cart_id.ok_or_else(|| required("cart_id"))?;
    let quantity = req.quantity.ok_or_else(|| required("quantity"))?;
    let removed = state.cart.set_quantity(cart_id, user.id, quantity).await?;
    let message = if removed {
        "Item removed from cart"
    } else {
        "Cart updated"
    };
    Ok(Json(ApiResponse::<()>::ok(message)))
}

pub async fn remove(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<RemoveQuery>,
) -> AppResult<Json<ApiResponse<()>>> {
    let cart_id = query.id.ok_or_else(|| required("id"))?;
    state.cart.remove_item(cart_id, user.id).await?;
    Ok(Json(ApiResponse::<()>::ok("Item removed from cart")))
}

pub async fn clear(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<()>>> {
    let removed = state.cart.clear(user.id).await?;
    tracing::debug!(user_id = user.id, removed, "Cart cleared");
    Ok(Json(ApiResponse::<()>::ok("Cart cleared")))
}
