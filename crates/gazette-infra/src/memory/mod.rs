//! In-memory repositories - used as fallback when no database is configured.
//!
//! Note: Data is lost on process restart. Matching behaves like the SQL
//! adapters: text filters are case-sensitive substring matches and pages
//! hold at most [`PAGE_SIZE`] items.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use gazette_core::domain::{Category, NewCategory, NewPost, Post};
use gazette_core::error::RepoError;
use gazette_core::ports::{
    CategoryRepository, IdOrder, PAGE_SIZE, Page, PostQuery, PostRepository,
};

/// In-memory category store using a HashMap with an async RwLock.
pub struct InMemoryCategoryRepository {
    store: RwLock<HashMap<i64, Category>>,
    next_id: AtomicI64,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryCategoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let mut categories: Vec<Category> = self.store.read().await.values().cloned().collect();
        categories.sort_by_key(|c| c.id);
        Ok(categories)
    }

    async fn insert(&self, new_category: NewCategory) -> Result<Category, RepoError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let category = Category {
            id,
            name: new_category.name,
        };
        self.store.write().await.insert(id, category.clone());
        Ok(category)
    }
}

/// Stored post row; the category is joined on read.
#[derive(Debug, Clone)]
struct PostRow {
    id: i64,
    title: String,
    body: String,
    category_id: i64,
}

/// In-memory post store. Shares the category repository so reads can
/// join the category the same way the SQL adapter does.
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<i64, PostRow>>,
    next_id: AtomicI64,
    categories: Arc<InMemoryCategoryRepository>,
}

impl InMemoryPostRepository {
    pub fn new(categories: Arc<InMemoryCategoryRepository>) -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            categories,
        }
    }

    async fn hydrate(&self, row: PostRow) -> Result<Post, RepoError> {
        let category = self
            .categories
            .find_by_id(row.category_id)
            .await?
            .ok_or_else(|| {
                RepoError::Constraint(format!("post {} has no category", row.id))
            })?;

        Ok(Post {
            id: row.id,
            title: row.title,
            body: row.body,
            category,
        })
    }

    async fn category_exists(&self, id: i64) -> Result<(), RepoError> {
        if self.categories.find_by_id(id).await?.is_none() {
            return Err(RepoError::Constraint(format!(
                "category {id} does not exist"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        let row = self.store.read().await.get(&id).cloned();
        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn list(&self, query: &PostQuery) -> Result<Page<Post>, RepoError> {
        let store = self.store.read().await;
        let categories = self.categories.store.read().await;

        let mut rows: Vec<PostRow> = store
            .values()
            .filter(|row| match &query.title {
                Some(title) => row.title.contains(title.as_str()),
                None => true,
            })
            .filter(|row| match &query.body {
                Some(body) => row.body.contains(body.as_str()),
                None => true,
            })
            .filter(|row| match &query.category_name {
                Some(name) => categories
                    .get(&row.category_id)
                    .is_some_and(|c| c.name.contains(name.as_str())),
                None => true,
            })
            .cloned()
            .collect();
        drop(categories);
        drop(store);

        match query.order {
            IdOrder::Asc => rows.sort_by_key(|row| row.id),
            IdOrder::Desc => rows.sort_by_key(|row| std::cmp::Reverse(row.id)),
        }

        let total_items = rows.len() as u64;
        let page = query.page.max(1);
        // Pages past the end are empty; the offset must not overflow on a
        // client-supplied page number.
        let offset = usize::try_from((page - 1).saturating_mul(PAGE_SIZE)).unwrap_or(usize::MAX);

        let mut items = Vec::new();
        for row in rows.into_iter().skip(offset).take(PAGE_SIZE as usize) {
            items.push(self.hydrate(row).await?);
        }

        Ok(Page {
            items,
            page,
            per_page: PAGE_SIZE,
            total_items,
        })
    }

    async fn insert(&self, new_post: NewPost) -> Result<Post, RepoError> {
        self.category_exists(new_post.category_id).await?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let row = PostRow {
            id,
            title: new_post.title,
            body: new_post.body,
            category_id: new_post.category_id,
        };
        self.store.write().await.insert(id, row.clone());

        self.hydrate(row).await
    }

    async fn update(&self, id: i64, fields: NewPost) -> Result<Post, RepoError> {
        self.category_exists(fields.category_id).await?;

        let mut store = self.store.write().await;
        let row = store.get_mut(&id).ok_or(RepoError::NotFound)?;
        row.title = fields.title;
        row.body = fields.body;
        row.category_id = fields.category_id;
        let row = row.clone();
        drop(store);

        self.hydrate(row).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn repos() -> (Arc<InMemoryCategoryRepository>, InMemoryPostRepository) {
        let categories = Arc::new(InMemoryCategoryRepository::new());
        let posts = InMemoryPostRepository::new(categories.clone());
        (categories, posts)
    }

    fn new_post(title: &str, body: &str, category_id: i64) -> NewPost {
        NewPost {
            title: title.to_owned(),
            body: body.to_owned(),
            category_id,
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let (categories, posts) = repos().await;
        let cat = categories
            .insert(NewCategory {
                name: "tech".to_owned(),
            })
            .await
            .unwrap();

        let first = posts.insert(new_post("a", "a", cat.id)).await.unwrap();
        let second = posts.insert(new_post("b", "b", cat.id)).await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.category.name, "tech");
    }

    #[tokio::test]
    async fn insert_rejects_unknown_category() {
        let (_categories, posts) = repos().await;

        let err = posts.insert(new_post("a", "a", 99)).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn update_of_unknown_post_is_not_found() {
        let (categories, posts) = repos().await;
        let cat = categories
            .insert(NewCategory {
                name: "tech".to_owned(),
            })
            .await
            .unwrap();

        let err = posts
            .update(404, new_post("a", "a", cat.id))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }

    #[tokio::test]
    async fn list_filters_partially_on_title_body_and_category_name() {
        let (categories, posts) = repos().await;
        let rust = categories
            .insert(NewCategory {
                name: "rustlang".to_owned(),
            })
            .await
            .unwrap();
        let news = categories
            .insert(NewCategory {
                name: "news".to_owned(),
            })
            .await
            .unwrap();

        posts
            .insert(new_post("Borrow checker", "ownership rules", rust.id))
            .await
            .unwrap();
        posts
            .insert(new_post("Morning brief", "ownership transfer", news.id))
            .await
            .unwrap();
        posts
            .insert(new_post("Evening brief", "weather", news.id))
            .await
            .unwrap();

        let by_title = posts
            .list(&PostQuery {
                title: Some("brief".to_owned()),
                ..PostQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(by_title.items.len(), 2);

        let by_body = posts
            .list(&PostQuery {
                body: Some("ownership".to_owned()),
                ..PostQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(by_body.items.len(), 2);

        let by_category = posts
            .list(&PostQuery {
                category_name: Some("rust".to_owned()),
                ..PostQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(by_category.items.len(), 1);
        assert_eq!(by_category.items[0].title, "Borrow checker");
    }

    #[tokio::test]
    async fn list_orders_by_id() {
        let (categories, posts) = repos().await;
        let cat = categories
            .insert(NewCategory {
                name: "tech".to_owned(),
            })
            .await
            .unwrap();
        for i in 0..3 {
            posts
                .insert(new_post(&format!("post {i}"), "body", cat.id))
                .await
                .unwrap();
        }

        let asc = posts.list(&PostQuery::default()).await.unwrap();
        let ids: Vec<i64> = asc.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let desc = posts
            .list(&PostQuery {
                order: IdOrder::Desc,
                ..PostQuery::default()
            })
            .await
            .unwrap();
        let ids: Vec<i64> = desc.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn list_pages_hold_at_most_ten_items() {
        let (categories, posts) = repos().await;
        let cat = categories
            .insert(NewCategory {
                name: "tech".to_owned(),
            })
            .await
            .unwrap();
        for i in 0..13 {
            posts
                .insert(new_post(&format!("post {i}"), "body", cat.id))
                .await
                .unwrap();
        }

        let first = posts.list(&PostQuery::default()).await.unwrap();
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.total_items, 13);
        assert_eq!(first.per_page, PAGE_SIZE);

        let second = posts
            .list(&PostQuery {
                page: 2,
                ..PostQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(second.items.len(), 3);
        assert_eq!(second.items[0].id, 11);
    }

    #[tokio::test]
    async fn list_page_past_the_end_is_empty_with_correct_totals() {
        let (categories, posts) = repos().await;
        let cat = categories
            .insert(NewCategory {
                name: "tech".to_owned(),
            })
            .await
            .unwrap();
        for i in 0..3 {
            posts
                .insert(new_post(&format!("post {i}"), "body", cat.id))
                .await
                .unwrap();
        }

        let past_the_end = posts
            .list(&PostQuery {
                page: 5,
                ..PostQuery::default()
            })
            .await
            .unwrap();
        assert!(past_the_end.items.is_empty());
        assert_eq!(past_the_end.total_items, 3);

        // An absurd page number must not overflow the offset computation
        let extreme = posts
            .list(&PostQuery {
                page: u64::MAX,
                ..PostQuery::default()
            })
            .await
            .unwrap();
        assert!(extreme.items.is_empty());
        assert_eq!(extreme.total_items, 3);
        assert_eq!(extreme.page, u64::MAX);
    }

    #[tokio::test]
    async fn update_replaces_all_given_fields() {
        let (categories, posts) = repos().await;
        let cat = categories
            .insert(NewCategory {
                name: "tech".to_owned(),
            })
            .await
            .unwrap();
        let created = posts.insert(new_post("old", "old body", cat.id)).await.unwrap();

        let updated = posts
            .update(created.id, new_post("old", "new body", cat.id))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "old");
        assert_eq!(updated.body, "new body");
        assert_eq!(updated.category.id, cat.id);
    }
}
