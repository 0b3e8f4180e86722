//! Blog post handlers.
//!
//! ```text
//! GET /api/blogs
//! POST /api/blogs {"title":"...","author":"...","url":"...","likes":0}
//! PUT /api/blogs/{id} {"likes":1}
//! DELETE /api/blogs/{id}
//! ```
//!
//! Mutations require `Authorization: Bearer <token>`; the caller is resolved
//! by [`AuthenticatedUser`] before the handler body runs.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::PostWithOwner;
use crate::domain::{
    ApiResult, Error, Post, PostChanges, PostDraft, PostId, PostValidationError, PublicUser,
};
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Body for creating a post, or the fields to change on update.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct PostRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

/// Owner projection embedded in post responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OwnerResponse {
    pub id: String,
    pub username: String,
    pub name: String,
}

impl From<PublicUser> for OwnerResponse {
    fn from(value: PublicUser) -> Self {
        Self {
            id: value.id.to_string(),
            username: value.username,
            name: value.name,
        }
    }
}

/// A post as returned to clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: u32,
    /// `null` when the owning account no longer exists.
    pub user: Option<OwnerResponse>,
}

impl PostResponse {
    fn new(post: &Post, owner: Option<PublicUser>) -> Self {
        Self {
            id: post.id().to_string(),
            title: post.title().to_owned(),
            author: post.author().to_owned(),
            url: post.url().to_owned(),
            likes: post.likes().get(),
            user: owner.map(OwnerResponse::from),
        }
    }
}

impl From<PostWithOwner> for PostResponse {
    fn from(value: PostWithOwner) -> Self {
        Self::new(&value.post, value.owner)
    }
}

fn map_post_validation_error(err: PostValidationError) -> Error {
    let details = match err.field() {
        Some(field) => json!({ "field": field, "code": err.code() }),
        None => json!({ "code": err.code() }),
    };
    Error::invalid_request(err.to_string()).with_details(details)
}

fn parse_post_id(raw: &str) -> Result<PostId, Error> {
    PostId::new(raw).map_err(map_post_validation_error)
}

/// List every post with its owner.
#[utoipa::path(
    get,
    path = "/api/blogs",
    responses(
        (status = 200, description = "Posts", body = [PostResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["blogs"],
    operation_id = "listPosts",
    security([])
)]
#[get("/blogs")]
pub async fn list_posts(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<PostResponse>>> {
    let posts = state.posts_query.list_posts().await?;
    Ok(web::Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// Create a post owned by the caller.
#[utoipa::path(
    post,
    path = "/api/blogs",
    request_body = PostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Missing title or url", body = Error),
        (status = 401, description = "Token missing, invalid or expired", body = Error),
        (status = 404, description = "Token subject no longer exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["blogs"],
    operation_id = "createPost"
)]
#[post("/blogs")]
pub async fn create_post(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<PostRequest>,
) -> ApiResult<HttpResponse> {
    let PostRequest {
        title,
        author,
        url,
        likes,
    } = payload.into_inner();
    let draft = PostDraft::try_new(title.as_deref(), author.as_deref(), url.as_deref(), likes)
        .map_err(map_post_validation_error)?;
    let post = state.posts.create(&caller, draft).await?;
    Ok(HttpResponse::Created().json(PostResponse::new(&post, Some(caller.public_profile()))))
}

/// Update fields of a post the caller owns.
#[utoipa::path(
    put,
    path = "/api/blogs/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    request_body = PostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 400, description = "Missing body or malformed id", body = Error),
        (status = 401, description = "Token missing, invalid or expired", body = Error),
        (status = 403, description = "Caller does not own the post", body = Error),
        (status = 404, description = "Post not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["blogs"],
    operation_id = "updatePost"
)]
#[put("/blogs/{id}")]
pub async fn update_post(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<PostRequest>,
) -> ApiResult<web::Json<PostResponse>> {
    let id = parse_post_id(&path)?;
    let PostRequest {
        title,
        author,
        url,
        likes,
    } = payload.into_inner();
    let changes = PostChanges::try_new(title.as_deref(), author.as_deref(), url.as_deref(), likes)
        .map_err(map_post_validation_error)?;
    let post = state.posts.update(&caller, id, changes).await?;
    Ok(web::Json(PostResponse::new(
        &post,
        Some(caller.public_profile()),
    )))
}

/// Delete a post the caller owns.
#[utoipa::path(
    delete,
    path = "/api/blogs/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 400, description = "Malformed id", body = Error),
        (status = 401, description = "Token missing, invalid or expired", body = Error),
        (status = 403, description = "Caller does not own the post", body = Error),
        (status = 404, description = "Post not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["blogs"],
    operation_id = "deletePost"
)]
#[delete("/blogs/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    state.posts.delete(&caller, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "posts_tests.rs"]
mod tests;
