//! Data Transfer Objects - request/response types for the API.
//!
//! Each read shape is its own struct instead of one annotated record:
//! the collection view carries the derived summary and omits the body,
//! the item view carries the full body and no summary, and the write
//! view is the only shape a client may send.

use serde::{Deserialize, Serialize};

/// Fields a client may supply when creating or patching a post.
/// All optional: create requires the full set, patch any subset.
/// `category` is the id of an existing category. The post id is never
/// writable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WritePostRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub category: Option<i64>,
}

/// Request to create a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WriteCategoryRequest {
    pub name: Option<String>,
}

/// Category as it appears in responses, embedded or standalone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryView {
    pub id: i64,
    pub name: String,
}

/// Single-post view: full body, no summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostItemResponse {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub category: CategoryView,
}

/// Collection entry: derived summary instead of the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCollectionItem {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub category: CategoryView,
}

/// A page of collection entries plus paging metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total_items: u64,
}
