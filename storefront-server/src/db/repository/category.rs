//! Category Repository
//!
//! Categories and their subcategories. Listings only return active rows,
//! ordered by `display_order` then name.

use super::{RepoError, RepoResult};
use shared::models::{Category, CategoryCreate, Subcategory, SubcategoryCreate};
use sqlx::SqlitePool;

const CATEGORY_COLUMNS: &str = "id, name, slug, description, display_order, is_active, created_at";
const SUBCATEGORY_COLUMNS: &str = "id, category_id, name, slug, display_order, is_active, created_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?");
    let row = sqlx::query_as::<_, Category>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_subcategory(pool: &SqlitePool, id: i64) -> RepoResult<Option<Subcategory>> {
    let sql = format!("SELECT {SUBCATEGORY_COLUMNS} FROM subcategories WHERE id = ?");
    let row = sqlx::query_as::<_, Subcategory>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn list_active(pool: &SqlitePool) -> RepoResult<Vec<Category>> {
    let sql = format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories WHERE is_active = 1 ORDER BY display_order, name"
    );
    let rows = sqlx::query_as::<_, Category>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// Active subcategories whose parent is also active
pub async fn list_active_subcategories(pool: &SqlitePool) -> RepoResult<Vec<Subcategory>> {
    let rows = sqlx::query_as::<_, Subcategory>(
        "SELECT s.id, s.category_id, s.name, s.slug, s.display_order, s.is_active, s.created_at \
         FROM subcategories s JOIN categories c ON c.id = s.category_id \
         WHERE s.is_active = 1 AND c.is_active = 1 \
         ORDER BY s.category_id, s.display_order, s.name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(
    pool: &SqlitePool,
    data: &CategoryCreate,
    slug: &str,
    now: i64,
) -> RepoResult<Category> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO categories (name, slug, description, display_order, is_active, created_at) VALUES (?, ?, ?, ?, 1, ?) RETURNING id",
    )
    .bind(data.name.trim())
    .bind(slug)
    .bind(&data.description)
    .bind(data.display_order)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to read back created category".into()))
}

/// Slugs are unique per parent category
pub async fn create_subcategory(
    pool: &SqlitePool,
    category_id: i64,
    data: &SubcategoryCreate,
    slug: &str,
    now: i64,
) -> RepoResult<Subcategory> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO subcategories (category_id, name, slug, display_order, is_active, created_at) VALUES (?, ?, ?, ?, 1, ?) RETURNING id",
    )
    .bind(category_id)
    .bind(data.name.trim())
    .bind(slug)
    .bind(data.display_order)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_subcategory(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to read back created subcategory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    fn category(name: &str, order: i64) -> CategoryCreate {
        CategoryCreate {
            name: name.into(),
            display_order: order,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_listing_follows_display_order() {
        let db = DbService::in_memory().await.unwrap();
        let kitchen = create(&db.pool, &category("Kitchen", 2), "kitchen", 1).await.unwrap();
        let books = create(&db.pool, &category("Books", 1), "books", 1).await.unwrap();
        create(&db.pool, &category("Apparel", 2), "apparel", 1).await.unwrap();

        let names: Vec<_> = list_active(&db.pool).await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["Books", "Apparel", "Kitchen"]);

        let sub = SubcategoryCreate {
            name: "Mugs".into(),
            ..Default::default()
        };
        let mugs = create_subcategory(&db.pool, kitchen.id, &sub, "mugs", 2).await.unwrap();
        assert_eq!(mugs.category_id, kitchen.id);
        // same slug under another parent is fine
        create_subcategory(&db.pool, books.id, &sub, "mugs", 2).await.unwrap();
        let err = create_subcategory(&db.pool, kitchen.id, &sub, "mugs", 3).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));

        assert_eq!(list_active_subcategories(&db.pool).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_category_slug() {
        let db = DbService::in_memory().await.unwrap();
        create(&db.pool, &category("Books", 0), "books", 1).await.unwrap();
        let err = create(&db.pool, &category("Books", 0), "books", 2).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
        assert!(find_by_id(&db.pool, 404).await.unwrap().is_none());
    }
}
