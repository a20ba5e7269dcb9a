//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use gazette_core::domain::{Category, NewCategory, NewPost, Post};
use gazette_core::error::RepoError;
use gazette_core::ports::{
    CategoryRepository, IdOrder, PAGE_SIZE, Page, PostQuery, PostRepository,
};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::post::{self, Entity as PostEntity};

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Attach the related category to a freshly written row.
    async fn hydrate(&self, model: post::Model) -> Result<Post, RepoError> {
        let category = CategoryEntity::find_by_id(model.category_id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        into_post(model, category)
    }
}

/// PostgreSQL category repository.
pub struct PostgresCategoryRepository {
    db: DbConn,
}

impl PostgresCategoryRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn map_db_err(err: sea_orm::DbErr) -> RepoError {
    let message = err.to_string();
    if message.contains("foreign key") || message.contains("violates") {
        RepoError::Constraint(message)
    } else {
        RepoError::Query(message)
    }
}

fn into_post(model: post::Model, category: Option<category::Model>) -> Result<Post, RepoError> {
    // The join column is NOT NULL, so a missing category means the
    // storage itself is inconsistent.
    let category =
        category.ok_or_else(|| RepoError::Constraint(format!("post {} has no category", model.id)))?;

    Ok(Post {
        id: model.id,
        title: model.title,
        body: model.body,
        category: category.into(),
    })
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        let row = PostEntity::find_by_id(id)
            .find_also_related(CategoryEntity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        row.map(|(model, category)| into_post(model, category))
            .transpose()
    }

    async fn list(&self, query: &PostQuery) -> Result<Page<Post>, RepoError> {
        let mut select = PostEntity::find().find_also_related(CategoryEntity);

        if let Some(title) = &query.title {
            select = select.filter(post::Column::Title.contains(title));
        }
        if let Some(body) = &query.body {
            select = select.filter(post::Column::Body.contains(body));
        }
        if let Some(name) = &query.category_name {
            select = select.filter(category::Column::Name.contains(name));
        }
        select = match query.order {
            IdOrder::Asc => select.order_by_asc(post::Column::Id),
            IdOrder::Desc => select.order_by_desc(post::Column::Id),
        };

        let page = query.page.max(1);
        let paginator = select.paginate(&self.db, PAGE_SIZE);
        let total_items = paginator.num_items().await.map_err(map_db_err)?;

        // Pages past the end are empty; never hand the paginator an index
        // whose offset would overflow.
        let num_pages = total_items.div_ceil(PAGE_SIZE);
        let items = if page - 1 < num_pages {
            let rows = paginator.fetch_page(page - 1).await.map_err(map_db_err)?;
            rows.into_iter()
                .map(|(model, category)| into_post(model, category))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            Vec::new()
        };

        Ok(Page {
            items,
            page,
            per_page: PAGE_SIZE,
            total_items,
        })
    }

    async fn insert(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let model = post::ActiveModel {
            title: Set(new_post.title),
            body: Set(new_post.body),
            category_id: Set(new_post.category_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        tracing::debug!(post_id = model.id, "Inserted post");

        self.hydrate(model).await
    }

    async fn update(&self, id: i64, fields: NewPost) -> Result<Post, RepoError> {
        let existing = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        let mut active: post::ActiveModel = existing.into();
        active.title = Set(fields.title);
        active.body = Set(fields.body);
        active.category_id = Set(fields.category_id);

        let model = active.update(&self.db).await.map_err(map_db_err)?;

        self.hydrate(model).await
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, new_category: NewCategory) -> Result<Category, RepoError> {
        let model = category::ActiveModel {
            name: Set(new_category.name),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }
}
