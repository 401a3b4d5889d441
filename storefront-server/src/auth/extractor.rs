//! Request extractors
//!
//! Bearer tokens are verified here; whether the user record is re-read
//! depends on the extractor a handler asks for.

use axum::extract::FromRequestParts;
use http::request::Parts;
use http::{HeaderMap, Uri};
use shared::models::User;

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::{AppError, ErrorCode};

/// Verify the bearer token if one is present
///
/// `Ok(None)` means no `Authorization` header; a malformed or invalid token
/// is always an error.
pub(crate) fn authenticate(
    headers: &HeaderMap,
    uri: &Uri,
    state: &ServerState,
) -> Result<Option<CurrentUser>, AppError> {
    let Some(header) = headers.get(http::header::AUTHORIZATION) else {
        return Ok(None);
    };
    let token = header
        .to_str()
        .ok()
        .and_then(JwtService::extract_from_header)
        .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;

    match state.get_jwt_service().validate_token(token) {
        Ok(claims) => Ok(Some(CurrentUser::from(claims))),
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", uri)
            );
            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// Claims-only identity; the token is required
impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        match authenticate(&parts.headers, &parts.uri, state)? {
            Some(user) => {
                parts.extensions.insert(user.clone());
                Ok(user)
            }
            None => {
                security_log!("WARN", "auth_missing", uri = format!("{:?}", parts.uri));
                Err(AppError::unauthorized())
            }
        }
    }
}

/// Identity when a token is sent, `None` for guests
///
/// A token that fails verification is rejected rather than treated as a guest.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<CurrentUser>);

impl FromRequestParts<ServerState> for OptionalUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(&parts.headers, &parts.uri, state)?;
        Ok(OptionalUser(user))
    }
}

/// Verified token plus the current, active user record
#[derive(Debug, Clone)]
pub struct ActiveUser(pub User);

impl FromRequestParts<ServerState> for ActiveUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let claims = CurrentUser::from_request_parts(parts, state).await?;
        let user = load_active(state, &claims).await?;
        Ok(ActiveUser(user))
    }
}

/// Active user whose stored role is admin
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl FromRequestParts<ServerState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // set by `require_admin`
        if let Some(admin) = parts.extensions.get::<AdminUser>() {
            return Ok(admin.clone());
        }

        let claims = CurrentUser::from_request_parts(parts, state).await?;
        let user = load_active(state, &claims).await?;
        if !user.is_admin() {
            security_log!(
                "WARN",
                "admin_denied",
                user_id = user.id,
                uri = format!("{:?}", parts.uri)
            );
            return Err(AppError::with_message(
                ErrorCode::AdminRequired,
                "Admin access required",
            ));
        }

        let admin = AdminUser(user);
        parts.extensions.insert(admin.clone());
        Ok(admin)
    }
}

/// Re-read the account behind a token; a deleted account no longer authenticates
async fn load_active(state: &ServerState, claims: &CurrentUser) -> Result<User, AppError> {
    state.accounts.active_user(claims.id).await.map_err(|e| {
        if e.code == ErrorCode::UserNotFound {
            security_log!("WARN", "auth_stale_user", user_id = claims.id);
            AppError::unauthorized()
        } else {
            e
        }
    })
}
