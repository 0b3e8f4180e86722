//! HTTP inbound adapter exposing the REST endpoints under `/api`.

pub mod auth;
pub mod error;
pub mod health;
pub mod login;
pub mod posts;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_web::{Scope, web};

pub use crate::domain::ApiResult;

/// The `/api` scope with every resource handler and the extractor error
/// handlers that keep failures in the JSON error envelope.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use bloglist::inbound::http::{api_scope, error::unknown_endpoint};
///
/// let app = App::new()
///     .service(api_scope())
///     .default_service(web::to(unknown_endpoint));
/// ```
pub fn api_scope() -> Scope {
    web::scope("/api")
        .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(login::login)
        .service(users::register_user)
        .service(users::list_users)
        .service(posts::list_posts)
        .service(posts::create_post)
        .service(posts::update_post)
        .service(posts::delete_post)
}
