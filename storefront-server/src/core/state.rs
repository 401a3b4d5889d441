use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::orders::OrderLedger;
use crate::services::{AccountService, CartStore, CatalogService};

/// Server state shared by every handler
///
/// Cheap to clone: the pool and services are reference counted.
///
/// | Field | Purpose |
/// |-------|---------|
/// | config | immutable configuration |
/// | db | SQLite pool |
/// | jwt_service | token issuance / verification |
/// | ledger | checkout, order status, tracking |
/// | catalog | products |
/// | cart | per-user carts |
/// | accounts | registration, login, admin accounts |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub jwt_service: Arc<JwtService>,
    pub ledger: OrderLedger,
    pub catalog: CatalogService,
    pub cart: CartStore,
    pub accounts: AccountService,
}

impl ServerState {
    /// Open the database named by the config and wire up the services
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_path).await?;
        Ok(Self::with_db(config.clone(), db))
    }

    /// Build state around an already opened database
    pub fn with_db(config: Config, db: DbService) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let pool = db.pool.clone();

        Self {
            ledger: OrderLedger::new(pool.clone()),
            catalog: CatalogService::new(pool.clone()),
            cart: CartStore::new(pool.clone()),
            accounts: AccountService::new(pool, jwt_service.clone()),
            jwt_service,
            db,
            config,
        }
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }
}
