//! Product API Handlers

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use shared::models::{Product, ProductFilter, ProductPage};

use crate::core::ServerState;
use crate::utils::{AppResult, Envelope, ok};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    /// Category slug
    pub category: Option<String>,
    /// Subcategory slug
    pub subcategory: Option<String>,
    pub featured: Option<String>,
    pub popular: Option<String>,
    pub new: Option<String>,
}

impl ListQuery {
    fn filter(self) -> (ProductFilter, Option<i64>, Option<i64>) {
        let filter = ProductFilter {
            search: self.search,
            category: self.category,
            subcategory: self.subcategory,
            featured: is_set(self.featured.as_deref()),
            popular: is_set(self.popular.as_deref()),
            new: is_set(self.new.as_deref()),
        };
        (filter, self.page, self.limit)
    }
}

/// Any value other than empty, `0` or `false` switches a flag on
fn is_set(value: Option<&str>) -> bool {
    value.is_some_and(|v| !matches!(v.trim(), "" | "0" | "false"))
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

/// Active products, paginated
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Envelope<ProductPage>> {
    let (filter, page, limit) = query.filter();
    Ok(ok(state.catalog.list(filter, page, limit).await?))
}

pub async fn featured(
    State(state): State<ServerState>,
    Query(query): Query<LimitQuery>,
) -> AppResult<Envelope<Vec<Product>>> {
    Ok(ok(state.catalog.featured(query.limit).await?))
}

pub async fn popular(
    State(state): State<ServerState>,
    Query(query): Query<LimitQuery>,
) -> AppResult<Envelope<Vec<Product>>> {
    Ok(ok(state.catalog.popular(query.limit).await?))
}

pub async fn new_arrivals(
    State(state): State<ServerState>,
    Query(query): Query<LimitQuery>,
) -> AppResult<Envelope<Vec<Product>>> {
    Ok(ok(state.catalog.new_arrivals(query.limit).await?))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Envelope<Product>> {
    Ok(ok(state.catalog.find(id).await?))
}

pub async fn get_by_slug(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Envelope<Product>> {
    Ok(ok(state.catalog.find_by_slug(&slug).await?))
}
