//! Post handlers - the CRUD surface of the service.
//!
//! Four operations: fetch one, fetch collection, create, partial update.
//! There is no delete. Writes go through the construct-then-validate
//! workflow of `gazette-core` before they reach a repository.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use gazette_core::domain::{Post, PostDraft};
use gazette_core::error::ValidationError;
use gazette_core::ports::{IdOrder, PostQuery};
use gazette_shared::dto::{
    CategoryView, PagedResponse, PostCollectionItem, PostItemResponse, WritePostRequest,
};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Query string of the collection endpoint. Filter parameters are named
/// after the filtered fields; `category.name` reaches through the relation.
#[derive(Debug, Default, Deserialize)]
pub struct ListPostsParams {
    pub page: Option<u64>,
    pub title: Option<String>,
    pub body: Option<String>,
    #[serde(rename = "category.name")]
    pub category_name: Option<String>,
    #[serde(rename = "order[id]")]
    pub order_id: Option<String>,
}

impl ListPostsParams {
    fn into_query(self) -> AppResult<PostQuery> {
        let order = match self.order_id.as_deref() {
            None | Some("asc") | Some("ASC") => IdOrder::Asc,
            Some("desc") | Some("DESC") => IdOrder::Desc,
            Some(other) => {
                return Err(AppError::BadRequest(format!(
                    "unknown id order `{other}`, expected `asc` or `desc`"
                )));
            }
        };

        Ok(PostQuery {
            title: self.title.filter(|s| !s.is_empty()),
            body: self.body.filter(|s| !s.is_empty()),
            category_name: self.category_name.filter(|s| !s.is_empty()),
            order,
            page: self.page.unwrap_or(1).max(1),
        })
    }
}

/// Item view: id, title, full body, category.
fn item_view(post: Post) -> PostItemResponse {
    PostItemResponse {
        id: post.id,
        title: post.title,
        body: post.body,
        category: CategoryView {
            id: post.category.id,
            name: post.category.name,
        },
    }
}

/// Collection view: id, title, derived summary, category - never the body.
fn collection_view(post: Post) -> PostCollectionItem {
    let summary = post.summary();
    PostCollectionItem {
        id: post.id,
        title: post.title,
        summary,
        category: CategoryView {
            id: post.category.id,
            name: post.category.name,
        },
    }
}

fn draft_from(request: WritePostRequest) -> PostDraft {
    PostDraft {
        title: request.title,
        body: request.body,
        category: request.category,
    }
}

/// The referenced category must exist before a write is accepted.
async fn ensure_category(state: &AppState, id: i64) -> AppResult<()> {
    if state.categories.find_by_id(id).await?.is_none() {
        return Err(AppError::Validation(vec![ValidationError::MissingRelation(
            "category",
        )]));
    }
    Ok(())
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {id} not found")))?;

    Ok(HttpResponse::Ok().json(item_view(post)))
}

/// GET /api/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    params: web::Query<ListPostsParams>,
) -> AppResult<HttpResponse> {
    let query = params.into_inner().into_query()?;

    let page = state.posts.list(&query).await?;

    Ok(HttpResponse::Ok().json(PagedResponse {
        items: page
            .items
            .into_iter()
            .map(collection_view)
            .collect::<Vec<_>>(),
        page: page.page,
        per_page: page.per_page,
        total_items: page.total_items,
    }))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<WritePostRequest>,
) -> AppResult<HttpResponse> {
    let new_post = draft_from(body.into_inner()).validate()?;

    ensure_category(&state, new_post.category_id).await?;

    let post = state.posts.insert(new_post).await?;
    tracing::info!(post_id = post.id, "Created post");

    Ok(HttpResponse::Created().json(item_view(post)))
}

/// PATCH /api/posts/{id}
pub async fn patch_post(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<WritePostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let current = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {id} not found")))?;

    let fields = draft_from(body.into_inner()).apply_to(&current)?;

    ensure_category(&state, fields.category_id).await?;

    let post = state.posts.update(id, fields).await?;

    Ok(HttpResponse::Ok().json(item_view(post)))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};
    use serde_json::{Value, json};

    use crate::handlers::configure_routes;
    use crate::state::AppState;

    async fn spawn_app() -> impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    > {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::in_memory()))
                .configure(configure_routes),
        )
        .await
    }

    async fn create_category(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        name: &str,
    ) -> i64 {
        let response: Value = test::call_and_read_body_json(
            app,
            test::TestRequest::post()
                .uri("/api/categories")
                .set_json(json!({ "name": name }))
                .to_request(),
        )
        .await;
        response["id"].as_i64().unwrap()
    }

    #[actix_web::test]
    async fn create_then_fetch_returns_the_item_view() {
        let app = spawn_app().await;
        let category_id = create_category(&app, "tech").await;

        let request = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({
                "title": "Hello",
                "body": "A body long enough to matter",
                "category": category_id,
            }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 201);

        let created: Value = test::read_body_json(response).await;
        let id = created["id"].as_i64().unwrap();

        let fetched: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/posts/{id}"))
                .to_request(),
        )
        .await;

        assert_eq!(fetched["title"], "Hello");
        assert_eq!(fetched["body"], "A body long enough to matter");
        assert_eq!(fetched["category"]["name"], "tech");
        // The item view never carries a summary
        assert!(fetched.get("summary").is_none());
    }

    #[actix_web::test]
    async fn blank_title_is_rejected_naming_the_field() {
        let app = spawn_app().await;
        let category_id = create_category(&app, "tech").await;

        let request = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({
                "title": "",
                "body": "fine",
                "category": category_id,
            }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 422);

        let error: Value = test::read_body_json(response).await;
        assert_eq!(error["invalid-params"][0]["name"], "title");
    }

    #[actix_web::test]
    async fn unknown_category_is_rejected_naming_the_relation() {
        let app = spawn_app().await;

        let request = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({
                "title": "Hello",
                "body": "fine",
                "category": 999,
            }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 422);

        let error: Value = test::read_body_json(response).await;
        assert_eq!(error["invalid-params"][0]["name"], "category");
    }

    #[actix_web::test]
    async fn patch_of_body_only_keeps_title_and_category() {
        let app = spawn_app().await;
        let category_id = create_category(&app, "tech").await;

        let created: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/posts")
                .set_json(json!({
                    "title": "Keep me",
                    "body": "old body",
                    "category": category_id,
                }))
                .to_request(),
        )
        .await;
        let id = created["id"].as_i64().unwrap();

        let patched: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::patch()
                .uri(&format!("/api/posts/{id}"))
                .set_json(json!({ "body": "new body" }))
                .to_request(),
        )
        .await;

        assert_eq!(patched["id"], id);
        assert_eq!(patched["title"], "Keep me");
        assert_eq!(patched["body"], "new body");
        assert_eq!(patched["category"]["id"], category_id);
    }

    #[actix_web::test]
    async fn collection_carries_summary_instead_of_body() {
        let app = spawn_app().await;
        let category_id = create_category(&app, "tech").await;

        let long_body = "x".repeat(100);
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/posts")
                .set_json(json!({
                    "title": "Long one",
                    "body": long_body,
                    "category": category_id,
                }))
                .to_request(),
        )
        .await;

        let listed: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/posts").to_request(),
        )
        .await;

        assert_eq!(listed["per_page"], 10);
        assert_eq!(listed["total_items"], 1);
        let item = &listed["items"][0];
        assert_eq!(
            item["summary"].as_str().unwrap(),
            format!("{}...", "x".repeat(70))
        );
        assert!(item.get("body").is_none());
    }

    #[actix_web::test]
    async fn collection_filters_and_orders() {
        let app = spawn_app().await;
        let tech = create_category(&app, "tech").await;
        let news = create_category(&app, "news").await;

        for (title, category) in [("alpha", tech), ("beta", news), ("alphabet", news)] {
            test::call_service(
                &app,
                test::TestRequest::post()
                    .uri("/api/posts")
                    .set_json(json!({
                        "title": title,
                        "body": "body",
                        "category": category,
                    }))
                    .to_request(),
            )
            .await;
        }

        let filtered: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/posts?title=alpha&order%5Bid%5D=desc")
                .to_request(),
        )
        .await;
        assert_eq!(filtered["total_items"], 2);
        assert_eq!(filtered["items"][0]["title"], "alphabet");

        let by_category: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/posts?category.name=new")
                .to_request(),
        )
        .await;
        assert_eq!(by_category["total_items"], 2);
    }

    #[actix_web::test]
    async fn unknown_post_is_404() {
        let app = spawn_app().await;

        let response = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/posts/12345").to_request(),
        )
        .await;
        assert_eq!(response.status(), 404);
    }
}
