//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP handler under `/api`, the health probes,
//! the request and response bodies, and the bearer token security scheme.
//! Swagger UI serves it at `/docs` in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::login::{LoginRequest, LoginResponse};
use crate::inbound::http::posts::{OwnerResponse, PostRequest, PostResponse};
use crate::inbound::http::users::{PostSummary, RegisterRequest, UserResponse};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Bloglist API",
        description = "Multi-user blog list: accounts, bearer tokens and owned posts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::login::login,
        crate::inbound::http::users::register_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::posts::list_posts,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::update_post,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        LoginRequest,
        LoginResponse,
        RegisterRequest,
        UserResponse,
        PostSummary,
        PostRequest,
        PostResponse,
        OwnerResponse
    )),
    tags(
        (name = "login", description = "Token issuance"),
        (name = "users", description = "Registration and user listing"),
        (name = "blogs", description = "Blog posts and their owners"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
