//! User Repository

use super::{RepoError, RepoResult};
use shared::models::{CustomerOverview, User, UserRole};
use sqlx::SqlitePool;

const USER_COLUMNS: &str = "id, email, first_name, last_name, phone, role, is_active, created_at";

/// Server-side user row including the password hash
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    #[sqlx(flatten)]
    pub user: User,
    pub password_hash: String,
}

/// Values for a new account
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: Option<&'a str>,
    pub role: UserRole,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Lookup for login, includes the hash
pub async fn find_record_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<UserRecord>> {
    let sql = format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = ?");
    let row = sqlx::query_as::<_, UserRecord>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn email_exists(pool: &SqlitePool, email: &str) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
        .bind(email)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// Insert an account; a taken email surfaces as `RepoError::Duplicate`
pub async fn create(pool: &SqlitePool, data: &NewUser<'_>, now: i64) -> RepoResult<User> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO users (email, password_hash, first_name, last_name, phone, role, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7) RETURNING id",
    )
    .bind(data.email)
    .bind(data.password_hash)
    .bind(data.first_name)
    .bind(data.last_name)
    .bind(data.phone)
    .bind(data.role)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to read back created user".into()))
}

/// Customers with their order counts, newest first
pub async fn list_customers(pool: &SqlitePool) -> RepoResult<Vec<CustomerOverview>> {
    let rows = sqlx::query_as::<_, CustomerOverview>(
        "SELECT u.id, u.email, u.first_name, u.last_name, u.phone, u.is_active, u.created_at, \
         (SELECT COUNT(*) FROM orders o WHERE o.user_id = u.id) AS order_count \
         FROM users u WHERE u.role = 'customer' ORDER BY u.created_at DESC, u.id DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_admins(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let sql = format!(
        "SELECT {USER_COLUMNS} FROM users WHERE role = 'admin' ORDER BY created_at DESC, id DESC"
    );
    let rows = sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// Delete an admin account; false when `id` is not an admin
pub async fn delete_admin(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM users WHERE id = ? AND role = 'admin'")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows == 1)
}

/// Replace an admin's password hash; false when `id` is not an admin
pub async fn set_admin_password(
    pool: &SqlitePool,
    id: i64,
    password_hash: &str,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ? AND role = 'admin'",
    )
    .bind(password_hash)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(rows == 1)
}
