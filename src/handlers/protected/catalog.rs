use serde::Serialize;

use crate::middleware::{ApiResponse, ApiResult};
use crate::workflow::Category;

#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    pub category: Category,
    pub items: &'static [&'static str],
    /// `Others` takes a description instead of a fixed item
    pub free_text: bool,
}

/// GET /api/catalog - categories and items a cart may contain
pub async fn catalog() -> ApiResult<Vec<CatalogEntry>> {
    let entries = Category::ALL
        .iter()
        .map(|category| CatalogEntry {
            category: *category,
            items: category.items(),
            free_text: *category == Category::Others,
        })
        .collect();
    Ok(ApiResponse::success(entries))
}
