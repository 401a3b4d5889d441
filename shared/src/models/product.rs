//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity
///
/// `price` is the authoritative unit price used at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub sku: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub is_featured: bool,
    pub is_popular: bool,
    pub is_new: bool,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,

    // -- Joined from categories / subcategories --
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub subcategory_name: Option<String>,
    pub subcategory_slug: Option<String>,
}

impl Product {
    /// Whether the product can be sold in the requested quantity
    pub fn has_stock(&self, quantity: i64) -> bool {
        self.is_active && self.stock >= quantity
    }
}

/// Create product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCreate {
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub sku: String,
    pub name: String,
    /// Derived from `name` when omitted
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_popular: bool,
    #[serde(default)]
    pub is_new: bool,
}

/// Update product payload (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub sku: Option<String>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub is_featured: Option<bool>,
    pub is_popular: Option<bool>,
    pub is_new: Option<bool>,
    pub is_active: Option<bool>,
}

/// Catalog listing filters; every field narrows the result when set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub search: Option<String>,
    /// Category slug
    pub category: Option<String>,
    /// Subcategory slug
    pub subcategory: Option<String>,
    pub featured: bool,
    pub popular: bool,
    pub new: bool,
}

/// Pagination metadata for list endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }
}

/// One page of products
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub pagination: Pagination,
}

/// Turn a product name into a URL slug: lowercase ASCII alphanumerics joined by `-`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
