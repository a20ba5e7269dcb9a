//! Category handlers.
//!
//! Categories exist so posts have something to reference: read-only
//! access plus create, nothing more.

use actix_web::{HttpResponse, web};

use gazette_core::domain::CategoryDraft;
use gazette_shared::dto::{CategoryView, WriteCategoryRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn view(category: gazette_core::domain::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
    }
}

/// GET /api/categories/{id}
pub async fn get_category(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let category = state
        .categories
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {id} not found")))?;

    Ok(HttpResponse::Ok().json(view(category)))
}

/// GET /api/categories
pub async fn list_categories(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.categories.list().await?;

    Ok(HttpResponse::Ok().json(
        categories.into_iter().map(view).collect::<Vec<_>>(),
    ))
}

/// POST /api/categories
pub async fn create_category(
    state: web::Data<AppState>,
    body: web::Json<WriteCategoryRequest>,
) -> AppResult<HttpResponse> {
    let new_category = CategoryDraft {
        name: body.into_inner().name,
    }
    .validate()?;

    let category = state.categories.insert(new_category).await?;
    tracing::info!(category_id = category.id, "Created category");

    Ok(HttpResponse::Created().json(view(category)))
}
