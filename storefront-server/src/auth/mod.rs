//! Authentication and authorization
//!
//! - [`JwtService`] - token issuance and verification
//! - [`CurrentUser`] - identity from verified claims
//! - [`OptionalUser`] / [`ActiveUser`] / [`AdminUser`] - request extractors
//! - [`require_admin`] - admin gate for the `/admin` routes
//!
//! # Trust policy
//!
//! | Extractor | Source | Used by |
//! |-----------|--------|---------|
//! | `CurrentUser` | claims only | cart, `GET /orders`, `/auth/check` |
//! | `OptionalUser` | claims only, token optional | `POST /orders` |
//! | `ActiveUser` | claims + user record | `/auth/me` |
//! | `AdminUser` | claims + user record, role admin | `/admin/*` |

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use extractor::{ActiveUser, AdminUser, OptionalUser};
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_admin;
