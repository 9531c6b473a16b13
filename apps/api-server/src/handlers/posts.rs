//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_shared::ApiResponse;
use quill_shared::dto::{CommentInput, ListPostsQuery, PostInput, SearchQuery};

use crate::middleware::auth::Identity;
use crate::middleware::error::ApiResult;
use crate::state::AppState;

/// GET /api/posts
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> ApiResult<HttpResponse> {
    let (posts, pagination) = state.posts.list(query.into_inner()).await?;
    let count = posts.len();

    Ok(HttpResponse::Ok().json(ApiResponse::paginated(posts, count, pagination)))
}

/// GET /api/posts/search?q=
pub async fn search(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<HttpResponse> {
    let posts = state.posts.search(query.into_inner()).await?;
    let count = posts.len();

    Ok(HttpResponse::Ok().json(ApiResponse::with_count(posts, count)))
}

/// GET /api/posts/{idOrSlug} - increments the view counter.
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let post = state.posts.get(&path).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostInput>,
) -> ApiResult<HttpResponse> {
    let post = state.posts.create(identity.user_id, body.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(post)))
}

/// PUT /api/posts/{id} - owner or admin only.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostInput>,
) -> ApiResult<HttpResponse> {
    let post = state
        .posts
        .update(
            identity.user_id,
            identity.role,
            path.into_inner(),
            body.into_inner(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// DELETE /api/posts/{id} - owner or admin only.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .posts
        .delete(identity.user_id, identity.role, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({}))))
}

/// POST /api/posts/{id}/comments - returns the full comment list.
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentInput>,
) -> ApiResult<HttpResponse> {
    let comments = state
        .posts
        .add_comment(path.into_inner(), identity.user_id, body.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(comments)))
}
