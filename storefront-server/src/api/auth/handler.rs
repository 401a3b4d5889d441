//! Auth API Handlers

use axum::{Json, extract::State};
use http::{HeaderMap, StatusCode, Uri};
use serde::Serialize;
use shared::models::{AuthResponse, LoginRequest, RegisterRequest, User, UserRole};

use crate::auth::ActiveUser;
use crate::auth::extractor::authenticate;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, Envelope, created, ok, ok_with_message};

/// Token status as seen by `/auth/check`
#[derive(Debug, Serialize)]
pub struct AuthCheck {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Envelope<AuthResponse>)> {
    let response = state.accounts.register(req).await?;
    Ok(created(response, "Registration successful"))
}

pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Envelope<AuthResponse>> {
    let response = state.accounts.login(req).await?;
    Ok(ok_with_message(response, "Login successful"))
}

pub async fn logout() -> Json<ApiResponse<()>> {
    Json(ApiResponse::<()>::ok(
        "Logged out successfully (clear token on client)",
    ))
}

/// Never fails: a missing or bad token reports `authenticated: false`
pub async fn check(
    State(state): State<ServerState>,
    headers: HeaderMap,
    uri: Uri,
) -> Envelope<AuthCheck> {
    let check = match authenticate(&headers, &uri, &state) {
        Ok(Some(user)) => AuthCheck {
            authenticated: true,
            user_id: Some(user.id),
            email: Some(user.email),
            role: Some(user.role),
        },
        Ok(None) | Err(_) => AuthCheck {
            authenticated: false,
            user_id: None,
            email: None,
            role: None,
        },
    };
    ok(check)
}

pub async fn me(ActiveUser(user): ActiveUser) -> AppResult<Envelope<User>> {
    Ok(ok(user))
}
