//! Catalog Service - public product browsing and admin product management

use crate::db::repository::{RepoError, category as category_repo, product as product_repo};
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    Category, CategoryCreate, CategoryListing, Pagination, Product, ProductCreate, ProductFilter,
    ProductPage, ProductUpdate, Subcategory, SubcategoryCreate, slugify,
};
use shared::util::now_millis;
use sqlx::SqlitePool;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;
pub const DEFAULT_FEATURED: i64 = 8;
pub const MAX_FEATURED: i64 = 50;

#[derive(Debug, Clone)]
pub struct CatalogService {
    pool: SqlitePool,
}

impl CatalogService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Active products matching `filter`, newest first
    pub async fn list(
        &self,
        mut filter: ProductFilter,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> AppResult<ProductPage> {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        filter.search = non_blank(filter.search);
        filter.category = non_blank(filter.category);
        filter.subcategory = non_blank(filter.subcategory);

        let (products, total) = product_repo::list_active(&self.pool, &filter, page, limit).await?;
        Ok(ProductPage {
            products,
            pagination: Pagination::new(page, limit, total),
        })
    }

    pub async fn featured(&self, limit: Option<i64>) -> AppResult<Vec<Product>> {
        self.flagged(
            ProductFilter {
                featured: true,
                ..Default::default()
            },
            limit,
        )
        .await
    }

    pub async fn popular(&self, limit: Option<i64>) -> AppResult<Vec<Product>> {
        self.flagged(
            ProductFilter {
                popular: true,
                ..Default::default()
            },
            limit,
        )
        .await
    }

    pub async fn new_arrivals(&self, limit: Option<i64>) -> AppResult<Vec<Product>> {
        self.flagged(
            ProductFilter {
                new: true,
                ..Default::default()
            },
            limit,
        )
        .await
    }

    /// Short showcase listing without pagination metadata
    async fn flagged(&self, filter: ProductFilter, limit: Option<i64>) -> AppResult<Vec<Product>> {
        let limit = limit.unwrap_or(DEFAULT_FEATURED).clamp(1, MAX_FEATURED);
        let (products, _) = product_repo::list_active(&self.pool, &filter, 1, limit).await?;
        Ok(products)
    }

    pub async fn find(&self, id: i64) -> AppResult<Product> {
        product_repo::find_active_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| product_not_found(id))
    }

    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Product> {
        product_repo::find_active_by_slug(&self.pool, slug.trim())
            .await?
            .ok_or_else(|| AppError::with_message(ErrorCode::ProductNotFound, "Product not found"))
    }

    /// Every product including inactive ones (admin)
    pub async fn list_all(&self) -> AppResult<Vec<Product>> {
        Ok(product_repo::list_all(&self.pool).await?)
    }

    pub async fn create(&self, data: ProductCreate) -> AppResult<Product> {
        validate_product_fields(
            Some(&data.sku),
            Some(&data.name),
            &data.description,
            Some(data.price),
            Some(data.stock),
        )?;

        let slug = derive_slug(data.slug.as_deref(), &data.name)?;
        if product_repo::slug_taken(&self.pool, &slug, None).await? {
            return Err(slug_taken(&slug));
        }
        self.check_placement(data.category_id, data.subcategory_id).await?;

        let product = product_repo::create(&self.pool, &data, &slug, now_millis())
            .await
            .map_err(duplicate_sku)?;
        tracing::info!(product_id = product.id, sku = %product.sku, "Product created");
        Ok(product)
    }

    /// Partial update; omitted fields keep their values
    pub async fn update(&self, id: i64, mut data: ProductUpdate) -> AppResult<Product> {
        validate_product_fields(
            data.sku.as_ref(),
            data.name.as_ref(),
            &data.description,
            data.price,
            data.stock,
        )?;

        if let Some(slug) = data.slug.take() {
            let slug = slugify(&slug);
            if slug.is_empty() {
                return Err(AppError::validation("slug must contain letters or digits"));
            }
            if product_repo::slug_taken(&self.pool, &slug, Some(id)).await? {
                return Err(slug_taken(&slug));
            }
            data.slug = Some(slug);
        }
        if data.category_id.is_some() || data.subcategory_id.is_some() {
            let current = product_repo::find_by_id(&self.pool, id)
                .await?
                .ok_or_else(|| product_not_found(id))?;
            self.check_placement(
                data.category_id.or(current.category_id),
                data.subcategory_id.or(current.subcategory_id),
            )
            .await?;
        }

        let product = product_repo::update(&self.pool, id, &data, now_millis())
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => product_not_found(id),
                other => duplicate_sku(other),
            })?;
        tracing::info!(product_id = id, "Product updated");
        Ok(product)
    }

    /// Soft delete: the row stays for order history
    pub async fn deactivate(&self, id: i64) -> AppResult<()> {
        if !product_repo::deactivate(&self.pool, id, now_millis()).await? {
            return Err(product_not_found(id));
        }
        tracing::info!(product_id = id, "Product deactivated");
        Ok(())
    }

    /// Active categories and subcategories for navigation and admin forms
    pub async fn categories(&self) -> AppResult<CategoryListing> {
        Ok(CategoryListing {
            categories: category_repo::list_active(&self.pool).await?,
            subcategories: category_repo::list_active_subcategories(&self.pool).await?,
        })
    }

    pub async fn create_category(&self, data: CategoryCreate) -> AppResult<Category> {
        validate_category_fields(&data.name, &data.description)?;
        let slug = derive_slug(data.slug.as_deref(), &data.name)?;

        let category = category_repo::create(&self.pool, &data, &slug, now_millis())
            .await
            .map_err(|e| duplicate_slug(e, &slug))?;
        tracing::info!(category_id = category.id, slug = %category.slug, "Category created");
        Ok(category)
    }

    pub async fn create_subcategory(
        &self,
        category_id: i64,
        data: SubcategoryCreate,
    ) -> AppResult<Subcategory> {
        validate_category_fields(&data.name, &None)?;
        if category_repo::find_by_id(&self.pool, category_id).await?.is_none() {
            return Err(category_not_found("category_id", category_id));
        }
        let slug = derive_slug(data.slug.as_deref(), &data.name)?;

        let subcategory =
            category_repo::create_subcategory(&self.pool, category_id, &data, &slug, now_millis())
                .await
                .map_err(|e| duplicate_slug(e, &slug))?;
        tracing::info!(
            category_id,
            subcategory_id = subcategory.id,
            slug = %subcategory.slug,
            "Subcategory created"
        );
        Ok(subcategory)
    }

    /// A subcategory must belong to the product's category
    async fn check_placement(
        &self,
        category_id: Option<i64>,
        subcategory_id: Option<i64>,
    ) -> AppResult<()> {
        if let Some(id) = category_id
            && category_repo::find_by_id(&self.pool, id).await?.is_none()
        {
            return Err(category_not_found("category_id", id));
        }
        if let Some(id) = subcategory_id {
            let subcategory = category_repo::find_subcategory(&self.pool, id)
                .await?
                .ok_or_else(|| category_not_found("subcategory_id", id))?;
            if category_id != Some(subcategory.category_id) {
                return Err(AppError::validation(
                    "Subcategory does not belong to the product's category",
                )
                .with_detail("subcategory_id", id));
            }
        }
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn derive_slug(explicit: Option<&str>, name: &str) -> AppResult<String> {
    let slug = match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => slugify(slug),
        None => slugify(name),
    };
    if slug.is_empty() {
        return Err(AppError::validation("A slug could not be derived from the name")
            .with_detail("slug", "required"));
    }
    Ok(slug)
}

fn category_not_found(field: &str, id: i64) -> AppError {
    AppError::with_message(ErrorCode::CategoryNotFound, format!("Category {id} not found"))
        .with_detail(field, id)
}

fn duplicate_slug(err: RepoError, slug: &str) -> AppError {
    match err {
        RepoError::Duplicate(_) => slug_taken(slug),
        other => other.into(),
    }
}

fn validate_category_fields(name: &str, description: &Option<String>) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::with_message(ErrorCode::RequiredField, "name is required")
            .with_detail("field", "name"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    validate_optional_text(description, "description", MAX_NOTE_LEN)
}

fn product_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::ProductNotFound, format!("Product {id} not found"))
        .with_detail("product_id", id)
}

fn slug_taken(slug: &str) -> AppError {
    AppError::with_message(ErrorCode::AlreadyExists, format!("Slug '{slug}' is already in use"))
        .with_detail("slug", slug)
}

fn duplicate_sku(err: RepoError) -> AppError {
    match err {
        RepoError::Duplicate(_) => {
            AppError::with_message(ErrorCode::AlreadyExists, "A product with this SKU already exists")
                .with_detail("sku", "duplicate")
        }
        other => other.into(),
    }
}

fn validate_product_fields(
    sku: Option<&String>,
    name: Option<&String>,
    description: &Option<String>,
    price: Option<f64>,
    stock: Option<i64>,
) -> AppResult<()> {
    for (field, value) in [("sku", sku), ("name", name)] {
        if let Some(value) = value {
            if value.trim().is_empty() {
                return Err(AppError::with_message(
                    ErrorCode::RequiredField,
                    format!("{field} is required"),
                )
                .with_detail("field", field));
            }
            if value.chars().count() > MAX_NAME_LEN {
                return Err(AppError::validation(format!(
                    "{field} must be at most {MAX_NAME_LEN} characters"
                )));
            }
        }
    }
    validate_optional_text(description, "description", MAX_NOTE_LEN)?;
    if let Some(price) = price
        && (!price.is_finite() || price < 0.0)
    {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidPrice,
            "Price must be a non-negative number",
        ));
    }
    if stock.is_some_and(|s| s < 0) {
        return Err(AppError::validation("Stock cannot be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    async fn service() -> CatalogService {
        CatalogService::new(DbService::in_memory().await.unwrap().pool)
    }

    fn mug() -> ProductCreate {
        ProductCreate {
            sku: "MUG-1".into(),
            name: "Ceramic Mug".into(),
            slug: None,
            description: Some("Holds tea".into()),
            price: 4.5,
            stock: 3,
            is_featured: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_derives_slug_and_rejects_clashes() {
        let catalog = service().await;
        let product = catalog.create(mug()).await.unwrap();
        assert_eq!(product.slug, "ceramic-mug");
        assert_eq!(catalog.find_by_slug("ceramic-mug").await.unwrap().id, product.id);

        let mut same_slug = mug();
        same_slug.sku = "MUG-2".into();
        let err = catalog.create(same_slug).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyExists);

        let mut same_sku = mug();
        same_sku.slug = Some("other mug".into());
        let err = catalog.create(same_sku).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyExists);
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_validation() {
        let catalog = service().await;
        let mut bad = mug();
        bad.price = -1.0;
        assert_eq!(
            catalog.create(bad).await.unwrap_err().code,
            ErrorCode::ProductInvalidPrice
        );

        let mut bad = mug();
        bad.name = "  ".into();
        assert_eq!(
            catalog.create(bad).await.unwrap_err().code,
            ErrorCode::RequiredField
        );
    }

    #[tokio::test]
    async fn test_list_clamps_paging() {
        let catalog = service().await;
        catalog.create(mug()).await.unwrap();

        let page = catalog
            .list(ProductFilter::default(), Some(0), Some(1000))
            .await
            .unwrap();
        assert_eq!(page.pagination.page, 1);
        assert_eq!(page.pagination.limit, MAX_PAGE_SIZE);
        assert_eq!(page.pagination.total, 1);

        let blank = ProductFilter {
            search: Some("  ".into()),
            category: Some("".into()),
            ..Default::default()
        };
        let page = catalog.list(blank, None, None).await.unwrap();
        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.pagination.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(catalog.featured(Some(0)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_deactivated_products_leave_public_views() {
        let catalog = service().await;
        let product = catalog.create(mug()).await.unwrap();
        catalog.deactivate(product.id).await.unwrap();

        assert_eq!(
            catalog.find(product.id).await.unwrap_err().code,
            ErrorCode::ProductNotFound
        );
        assert!(catalog.featured(None).await.unwrap().is_empty());
        assert_eq!(catalog.list_all().await.unwrap().len(), 1);
        assert!(catalog.deactivate(product.id + 1).await.is_err());
    }

    #[tokio::test]
    async fn test_update_reslugs_and_reports_missing() {
        let catalog = service().await;
        let product = catalog.create(mug()).await.unwrap();

        let updated = catalog
            .update(
                product.id,
                ProductUpdate {
                    slug: Some("Big Mug".into()),
                    stock: Some(9),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.slug, "big-mug");
        assert_eq!(updated.stock, 9);
        assert_eq!(updated.name, "Ceramic Mug");

        let err = catalog
            .update(product.id + 5, ProductUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductNotFound);
    }

    #[tokio::test]
    async fn test_showcase_listings_follow_flags() {
        let catalog = service().await;
        catalog.create(mug()).await.unwrap();
        let mut kettle = mug();
        kettle.sku = "KETTLE-1".into();
        kettle.name = "Kettle".into();
        kettle.is_featured = false;
        kettle.is_popular = true;
        kettle.is_new = true;
        catalog.create(kettle).await.unwrap();

        let names = |rows: Vec<Product>| rows.into_iter().map(|p| p.name).collect::<Vec<_>>();
        assert_eq!(names(catalog.featured(None).await.unwrap()), ["Ceramic Mug"]);
        assert_eq!(names(catalog.popular(None).await.unwrap()), ["Kettle"]);
        assert_eq!(names(catalog.new_arrivals(Some(500)).await.unwrap()), ["Kettle"]);
    }

    #[tokio::test]
    async fn test_categories_and_product_placement() {
        let catalog = service().await;
        let kitchen = catalog
            .create_category(CategoryCreate {
                name: "Kitchen & Dining".into(),
                display_order: 1,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(kitchen.slug, "kitchen-dining");
        let books = catalog
            .create_category(CategoryCreate {
                name: "Books".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let mugs = catalog
            .create_subcategory(
                kitchen.id,
                SubcategoryCreate {
                    name: "Mugs".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = catalog
            .create_subcategory(
                kitchen.id + 100,
                SubcategoryCreate {
                    name: "Orphans".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CategoryNotFound);

        let listing = catalog.categories().await.unwrap();
        assert_eq!(listing.categories[0].name, "Books");
        assert_eq!(listing.subcategories.len(), 1);

        // subcategory from another category is refused
        let mut misplaced = mug();
        misplaced.category_id = Some(books.id);
        misplaced.subcategory_id = Some(mugs.id);
        assert_eq!(
            catalog.create(misplaced).await.unwrap_err().code,
            ErrorCode::ValidationFailed
        );

        let mut placed = mug();
        placed.category_id = Some(kitchen.id);
        placed.subcategory_id = Some(mugs.id);
        let product = catalog.create(placed).await.unwrap();
        assert_eq!(product.subcategory_slug.as_deref(), Some("mugs"));

        let filter = ProductFilter {
            category: Some("kitchen-dining".into()),
            subcategory: Some(" mugs ".into()),
            ..Default::default()
        };
        assert_eq!(catalog.list(filter, None, None).await.unwrap().pagination.total, 1);

        let err = catalog
            .update(
                product.id,
                ProductUpdate {
                    category_id: Some(books.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
