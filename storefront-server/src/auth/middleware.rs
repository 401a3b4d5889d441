//! Authentication middleware

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::utils::AppError;

/// Admin gate for a whole router
///
/// Resolves [`AdminUser`] (token verified, account re-read, role admin) and
/// stores it in the request extensions so handlers can extract it again for free.
///
/// | Failure | Status |
/// |---------|--------|
/// | no / invalid / expired token | 401 |
/// | account deleted or disabled | 401 |
/// | role is not admin | 403 |
pub async fn require_admin(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // CORS preflight
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let (mut parts, body) = req.into_parts();
    let admin = AdminUser::from_request_parts(&mut parts, &state).await?;
    parts.extensions.insert(admin);
    Ok(next.run(Request::from_parts(parts, body)).await)
}
