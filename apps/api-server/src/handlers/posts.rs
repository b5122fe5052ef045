//! Post handlers.

use actix_web::{HttpResponse, web};

use folio_core::domain::{NewPost, Post, PostChanges, PostId};
use folio_shared::ApiResponse;
use folio_shared::dto::{CreatePostRequest, ListPostsQuery, PostResponse, UpdatePostRequest};

use crate::middleware::error::AppResult;
use crate::state::AppState;

fn to_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id.get(),
        title: post.title,
        description: post.description,
        banner: post.banner,
        date: post.updated_at.to_rfc3339(),
    }
}

/// GET /api/posts
/// GET /api/posts?recent=4
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let posts = match query.recent {
        Some(limit) => state.posts.recent(limit).await?,
        None => state.posts.list().await?,
    };

    let body: Vec<PostResponse> = posts.into_iter().map(to_response).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}

/// GET /api/posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id: PostId = path.into_inner().parse()?;
    let post = state.posts.get(id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(to_response(post))))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post = state
        .posts
        .create(NewPost::new(req.title, req.description, req.banner))
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        to_response(post),
        "Post published",
    )))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id: PostId = path.into_inner().parse()?;
    let req = body.into_inner();
    let post = state
        .posts
        .update(id, PostChanges::new(req.title, req.description, req.banner))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(to_response(post))))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id: PostId = path.into_inner().parse()?;
    let post = state.posts.delete(id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        to_response(post),
        "Post deleted",
    )))
}
