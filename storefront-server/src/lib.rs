//! Storefront Server - e-commerce backend
//!
//! JSON API for a small shop: catalog, carts, checkout and order tracking,
//! with JWT authentication and an admin area.
//!
//! # Module layout
//!
//! ```text
//! storefront-server/src/
//! ├── core/       # config, state, errors, router and listener
//! ├── auth/       # JWT, extractors, admin middleware
//! ├── orders/     # order ledger (checkout transaction, status history)
//! ├── services/   # catalog, cart, accounts
//! ├── api/        # HTTP routes and handlers
//! ├── db/         # SQLite pool, migrations, repositories
//! └── utils/      # response helpers, logging, passwords, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod services;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState, build_router};
pub use orders::{LedgerError, OrderLedger};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use utils::logger::{init_logger, init_logger_with_file};

/// Security event on the `security` target
///
/// ```ignore
/// security_log!("WARN", "auth_failed", user_id = 7, uri = "/api/v1/cart");
/// ```
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
   _____ __                  ____                 __
  / ___// /_____  ________  / __/________  ____  / /_
  \__ \/ __/ __ \/ ___/ _ \/ /_/ ___/ __ \/ __ \/ __/
 ___/ / /_/ /_/ / /  /  __/ __/ /  / /_/ / / / / /_
/____/\__/\____/_/   \___/_/ /_/   \____/_/ /_/\__/
    "#
    );
}

/// Load `.env` and read the configuration
///
/// Logging is set up by the caller once the config is known.
pub fn setup_environment() -> Result<Config, crate::core::ServerError> {
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        eprintln!("Failed to load .env: {e}");
    }
    Config::from_env()
}
