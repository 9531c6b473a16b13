//! Category handlers. Mutations are admin-only.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_shared::ApiResponse;
use quill_shared::dto::CategoryInput;

use crate::middleware::auth::Identity;
use crate::middleware::error::ApiResult;
use crate::state::AppState;

/// GET /api/categories
pub async fn list(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let categories = state.categories.list().await?;
    let count = categories.len();

    Ok(HttpResponse::Ok().json(ApiResponse::with_count(categories, count)))
}

/// GET /api/categories/{idOrSlug}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let category = state.categories.get(&path).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(category)))
}

/// POST /api/categories - admin only.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CategoryInput>,
) -> ApiResult<HttpResponse> {
    identity.require_admin()?;

    let category = state.categories.create(body.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(category)))
}

/// PUT /api/categories/{id} - admin only.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CategoryInput>,
) -> ApiResult<HttpResponse> {
    identity.require_admin()?;

    let category = state
        .categories
        .update(path.into_inner(), body.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(category)))
}

/// DELETE /api/categories/{id} - admin only.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    identity.require_admin()?;

    state.categories.delete(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({}))))
}
