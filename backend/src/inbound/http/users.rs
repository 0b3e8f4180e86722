//! User registration and listing handlers.
//!
//! ```text
//! POST /api/users {"username":"root","name":"Superuser","password":"sekret"}
//! GET /api/users
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::UserWithPosts;
use crate::domain::{ApiResult, Error, Post, Registration, RegistrationValidationError, User};
use crate::inbound::http::state::HttpState;

/// Registration request body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Post as embedded in a user listing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PostSummary {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: u32,
}

impl From<&Post> for PostSummary {
    fn from(value: &Post) -> Self {
        Self {
            id: value.id().to_string(),
            title: value.title().to_owned(),
            author: value.author().to_owned(),
            url: value.url().to_owned(),
            likes: value.likes().get(),
        }
    }
}

/// Public view of a user. The password hash is never included.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub name: String,
    pub blogs: Vec<PostSummary>,
}

impl UserResponse {
    fn new(user: &User, posts: &[Post]) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            name: user.name().to_owned(),
            blogs: posts.iter().map(PostSummary::from).collect(),
        }
    }
}

impl From<UserWithPosts> for UserResponse {
    fn from(value: UserWithPosts) -> Self {
        Self::new(&value.user, &value.posts)
    }
}

fn map_registration_error(err: RegistrationValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": err.field(), "code": err.code() }))
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request or duplicate username", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users")]
pub async fn register_user(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        username,
        name,
        password,
    } = payload.into_inner();
    let registration =
        Registration::try_from_parts(username.as_deref(), name.as_deref(), password.as_deref())
            .map_err(map_registration_error)?;
    let user = state.users.register(registration).await?;
    Ok(HttpResponse::Created().json(UserResponse::new(&user, &[])))
}

/// List users with the posts each one owns.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security([])
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users_query.list_users().await?;
    Ok(web::Json(users.into_iter().map(UserResponse::from).collect()))
}
