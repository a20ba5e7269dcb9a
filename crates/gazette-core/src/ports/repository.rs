use async_trait::async_trait;

use crate::domain::{Category, NewCategory, NewPost, Post};
use crate::error::RepoError;

/// Fixed number of items per collection page.
pub const PAGE_SIZE: u64 = 10;

/// Ordering of the post collection by id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdOrder {
    #[default]
    Asc,
    Desc,
}

/// Filters and paging for a post collection fetch.
///
/// Text filters are partial substring matches; absent filters match
/// everything.
#[derive(Debug, Clone)]
pub struct PostQuery {
    pub title: Option<String>,
    pub body: Option<String>,
    /// Matched against the name of the related category.
    pub category_name: Option<String>,
    pub order: IdOrder,
    /// 1-based page number.
    pub page: u64,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            title: None,
            body: None,
            category_name: None,
            order: IdOrder::default(),
            page: 1,
        }
    }
}

/// One page of a collection, with paging metadata.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total_items: u64,
}

/// Post repository. No delete - the API does not expose one.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find a post by its unique id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError>;

    /// Fetch one page of posts matching the query.
    async fn list(&self, query: &PostQuery) -> Result<Page<Post>, RepoError>;

    /// Persist a new post; storage assigns the id. Fails with
    /// [`RepoError::Constraint`] when the category does not exist.
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Replace the stored fields of an existing post.
    /// Fails with [`RepoError::NotFound`] when the id is unknown.
    async fn update(&self, id: i64, fields: NewPost) -> Result<Post, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, RepoError>;

    async fn list(&self) -> Result<Vec<Category>, RepoError>;

    async fn insert(&self, category: NewCategory) -> Result<Category, RepoError>;
}
