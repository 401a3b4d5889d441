//! Product Repository

use super::{RepoError, RepoResult};
use shared::models::{Product, ProductCreate, ProductFilter, ProductUpdate};
use sqlx::{SqliteConnection, SqlitePool};

/// Product columns plus the names and slugs of its category and subcategory
const PRODUCT_SELECT: &str = "SELECT p.id, p.category_id, p.subcategory_id, p.sku, p.name, p.slug, p.description, \
    p.price, p.stock, p.is_featured, p.is_popular, p.is_new, p.is_active, p.created_at, p.updated_at, \
    c.name AS category_name, c.slug AS category_slug, s.name AS subcategory_name, s.slug AS subcategory_slug \
    FROM products p \
    LEFT JOIN categories c ON c.id = p.category_id \
    LEFT JOIN subcategories s ON s.id = p.subcategory_id";

/// Catalog filter; binds ?1 pattern, ?2 category slug, ?3 subcategory slug, ?4..?6 flags
const LISTING_FILTER: &str = "p.is_active = 1 \
    AND (?1 IS NULL OR p.name LIKE ?1 ESCAPE '\\' OR p.description LIKE ?1 ESCAPE '\\' OR p.sku LIKE ?1 ESCAPE '\\') \
    AND (?2 IS NULL OR c.slug = ?2) \
    AND (?3 IS NULL OR s.slug = ?3) \
    AND (?4 = 0 OR p.is_featured = 1) \
    AND (?5 = 0 OR p.is_popular = 1) \
    AND (?6 = 0 OR p.is_new = 1)";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE p.id = ?");
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Active product by id (public catalog)
pub async fn find_active_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    Ok(find_by_id(pool, id).await?.filter(|p| p.is_active))
}

/// Active product by slug (public catalog)
pub async fn find_active_by_slug(pool: &SqlitePool, slug: &str) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE p.slug = ? AND p.is_active = 1");
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Page of active products matching `filter`, newest first, with the total match count
pub async fn list_active(
    pool: &SqlitePool,
    filter: &ProductFilter,
    page: i64,
    limit: i64,
) -> RepoResult<(Vec<Product>, i64)> {
    let offset = (page - 1).max(0) * limit;
    let pattern = filter
        .search
        .as_deref()
        .map(|s| format!("%{}%", escape_like(s)));

    let count_sql = format!(
        "SELECT COUNT(*) FROM products p \
         LEFT JOIN categories c ON c.id = p.category_id \
         LEFT JOIN subcategories s ON s.id = p.subcategory_id \
         WHERE {LISTING_FILTER}"
    );
    let total: i64 = sqlx::query_scalar(&count_sql)
        .bind(&pattern)
        .bind(&filter.category)
        .bind(&filter.subcategory)
        .bind(filter.featured)
        .bind(filter.popular)
        .bind(filter.new)
        .fetch_one(pool)
        .await?;

    let sql = format!(
        "{PRODUCT_SELECT} WHERE {LISTING_FILTER} ORDER BY p.created_at DESC, p.id DESC LIMIT ?7 OFFSET ?8"
    );
    let products = sqlx::query_as::<_, Product>(&sql)
        .bind(&pattern)
        .bind(&filter.category)
        .bind(&filter.subcategory)
        .bind(filter.featured)
        .bind(filter.popular)
        .bind(filter.new)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok((products, total))
}

/// Every product including inactive ones (admin)
pub async fn list_all(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let sql = format!("{PRODUCT_SELECT} ORDER BY p.created_at DESC, p.id DESC");
    let rows = sqlx::query_as::<_, Product>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn create(
    pool: &SqlitePool,
    data: &ProductCreate,
    slug: &str,
    now: i64,
) -> RepoResult<Product> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO products (category_id, subcategory_id, sku, name, slug, description, price, stock, is_featured, is_popular, is_new, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?) RETURNING id",
    )
    .bind(data.category_id)
    .bind(data.subcategory_id)
    .bind(data.sku.trim())
    .bind(data.name.trim())
    .bind(slug)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.stock)
    .bind(data.is_featured)
    .bind(data.is_popular)
    .bind(data.is_new)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to read back created product".into()))
}

/// Partial update; absent fields keep their value
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: &ProductUpdate,
    now: i64,
) -> RepoResult<Product> {
    let rows = sqlx::query(
        "UPDATE products SET sku = COALESCE(?1, sku), name = COALESCE(?2, name), slug = COALESCE(?3, slug), \
         description = COALESCE(?4, description), price = COALESCE(?5, price), stock = COALESCE(?6, stock), \
         is_featured = COALESCE(?7, is_featured), is_active = COALESCE(?8, is_active), updated_at = ?9, \
         category_id = COALESCE(?11, category_id), subcategory_id = COALESCE(?12, subcategory_id), \
         is_popular = COALESCE(?13, is_popular), is_new = COALESCE(?14, is_new) WHERE id = ?10",
    )
    .bind(data.sku.as_deref().map(str::trim))
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.slug)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.stock)
    .bind(data.is_featured)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .bind(data.category_id)
    .bind(data.subcategory_id)
    .bind(data.is_popular)
    .bind(data.is_new)
    .execute(pool)
    .await?
    .rows_affected();

    if rows == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

/// Soft delete: order items keep referencing the row
pub async fn deactivate(pool: &SqlitePool, id: i64, now: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE products SET is_active = 0, updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows > 0)
}

/// Whether a slug is already used by another product
pub async fn slug_taken(pool: &SqlitePool, slug: &str, exclude_id: Option<i64>) -> RepoResult<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE slug = ? AND id != COALESCE(?, -1)")
            .bind(slug)
            .bind(exclude_id)
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}

/// Conditional decrement inside a transaction
///
/// Returns false when the row is missing, inactive or has less than `quantity` in stock.
pub async fn decrement_stock(
    conn: &mut SqliteConnection,
    id: i64,
    quantity: i64,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE products SET stock = stock - ?1, updated_at = ?2 WHERE id = ?3 AND is_active = 1 AND stock >= ?1",
    )
    .bind(quantity)
    .bind(now)
    .bind(id)
    .execute(conn)
    .await?
    .rows_affected();
    Ok(rows == 1)
}

fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
