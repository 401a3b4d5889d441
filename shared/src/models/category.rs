//! Category Model
//!
//! Two-level catalog taxonomy: a product may sit in one category and,
//! within it, one subcategory.

use serde::{Deserialize, Serialize};

/// Category entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub display_order: i64,
    pub is_active: bool,
    pub created_at: i64,
}

/// Subcategory entity, always owned by one category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Subcategory {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub slug: String,
    pub display_order: i64,
    pub is_active: bool,
    pub created_at: i64,
}

/// Create category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    /// Derived from `name` when omitted
    pub slug: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub display_order: i64,
}

/// Create subcategory payload; the parent comes from the route
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubcategoryCreate {
    pub name: String,
    pub slug: Option<String>,
    #[serde(default)]
    pub display_order: i64,
}

/// Active categories and subcategories, each in display order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryListing {
    pub categories: Vec<Category>,
    pub subcategories: Vec<Subcategory>,
}
