//! Admin API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use http::StatusCode;
use serde::Serialize;
use shared::models::{
    AdminCreate, AuthResponse, AuthUser, Category, CategoryCreate, CategoryListing,
    CustomerOverview, LoginRequest, OrderStatistics, OrderStatusUpdate, OrderSummary,
    PasswordReset, Product, ProductCreate, ProductUpdate, Subcategory, SubcategoryCreate, User,
    UserRole,
};

use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::security_log;
use crate::utils::{
    ApiResponse, AppError, AppResult, Envelope, ErrorCode, created, ok, ok_with_message,
};

/// Admin panel sign-in: same credentials check as `/auth/login`, customers refused
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Envelope<AuthResponse>> {
    let response = state.accounts.login(req).await?;
    if response.user.role != UserRole::Admin {
        security_log!("WARN", "admin_login_refused", user_id = response.user.id);
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    Ok(ok_with_message(response, "Login successful"))
}

#[derive(Debug, Serialize)]
pub struct AdminCheck {
    pub authenticated: bool,
    pub admin: AuthUser,
}

pub async fn check(AdminUser(admin): AdminUser) -> AppResult<Envelope<AdminCheck>> {
    Ok(ok(AdminCheck {
        authenticated: true,
        admin: AuthUser::from(&admin),
    }))
}

// ── Orders ──────────────────────────────────────────────────────────

pub async fn list_orders(State(state): State<ServerState>) -> AppResult<Envelope<Vec<OrderSummary>>> {
    Ok(ok(state.ledger.list_all().await?))
}

pub async fn order_stats(State(state): State<ServerState>) -> AppResult<Envelope<OrderStatistics>> {
    Ok(ok(state.ledger.statistics().await?))
}

pub async fn update_order_status(
    State(state): State<ServerState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
    Json(req): Json<OrderStatusUpdate>,
) -> AppResult<Json<ApiResponse<()>>> {
    if req.status.trim().is_empty() {
        return Err(
            AppError::with_message(ErrorCode::RequiredField, "Status is required")
                .with_detail("field", "status"),
        );
    }
    let status = state
        .ledger
        .update_status(id, &req.status, req.notes.as_deref())
        .await?;
    tracing::info!(order_id = id, admin_id = admin.id, status = %status, "Admin changed order status");
    Ok(Json(ApiResponse::<()>::ok("Order status updated successfully")))
}

// ── Categories ──────────────────────────────────────────────────────

pub async fn list_categories(
    State(state): State<ServerState>,
) -> AppResult<Envelope<CategoryListing>> {
    Ok(ok(state.catalog.categories().await?))
}

pub async fn create_category(
    State(state): State<ServerState>,
    Json(req): Json<CategoryCreate>,
) -> AppResult<(StatusCode, Envelope<Category>)> {
    let category = state.catalog.create_category(req).await?;
    Ok(created(category, "Category created successfully"))
}

pub async fn create_subcategory(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(req): Json<SubcategoryCreate>,
) -> AppResult<(StatusCode, Envelope<Subcategory>)> {
    let subcategory = state.catalog.create_subcategory(id, req).await?;
    Ok(created(subcategory, "Subcategory created successfully"))
}

// ── Products ────────────────────────────────────────────────────────

pub async fn list_products(State(state): State<ServerState>) -> AppResult<Envelope<Vec<Product>>> {
    Ok(ok(state.catalog.list_all().await?))
}

pub async fn create_product(
    State(state): State<ServerState>,
    Json(req): Json<ProductCreate>,
) -> AppResult<(StatusCode, Envelope<Product>)> {
    let product = state.catalog.create(req).await?;
    Ok(created(product, "Product created successfully"))
}

pub async fn update_product(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(req): Json<ProductUpdate>,
) -> AppResult<Envelope<Product>> {
    let product = state.catalog.update(id, req).await?;
    Ok(ok_with_message(product, "Product updated successfully"))
}

/// Soft delete
pub async fn delete_product(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.catalog.deactivate(id).await?;
    Ok(Json(ApiResponse::<()>::ok("Product deleted successfully")))
}

// ── Accounts ────────────────────────────────────────────────────────

pub async fn list_customers(
    State(state): State<ServerState>,
) -> AppResult<Envelope<Vec<CustomerOverview>>> {
    Ok(ok(state.accounts.list_customers().await?))
}

pub async fn list_admins(State(state): State<ServerState>) -> AppResult<Envelope<Vec<User>>> {
    Ok(ok(state.accounts.list_admins().await?))
}

pub async fn create_admin(
    State(state): State<ServerState>,
    Json(req): Json<AdminCreate>,
) -> AppResult<(StatusCode, Envelope<User>)> {
    let admin = state.accounts.create_admin(req).await?;
    Ok(created(admin, "Admin created successfully"))
}

pub async fn delete_admin(
    State(state): State<ServerState>,
    AdminUser(actor): AdminUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.accounts.delete_admin(actor.id, id).await?;
    Ok(Json(ApiResponse::<()>::ok("Admin deleted successfully")))
}

pub async fn reset_admin_password(
    State(state): State<ServerState>,
    AdminUser(actor): AdminUser,
    Path(id): Path<i64>,
    Json(req): Json<PasswordReset>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .accounts
        .reset_admin_password(actor.id, id, &req.password)
        .await?;
    Ok(Json(ApiResponse::<()>::ok("Password reset successfully")))
}
