//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod identity_resolver;
mod login_service;
mod ownership_ledger;
mod password_hasher;
mod post_repository;
mod posts_command;
mod posts_query;
mod user_repository;
mod users_command;
mod users_query;

pub use identity_resolver::IdentityResolver;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{LoginService, LoginSession};
#[cfg(test)]
pub use ownership_ledger::MockOwnershipLedger;
pub use ownership_ledger::{OwnershipLedger, OwnershipLedgerError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostRepository, PostRepositoryError};
#[cfg(test)]
pub use posts_command::MockPostsCommand;
pub use posts_command::PostsCommand;
#[cfg(test)]
pub use posts_query::MockPostsQuery;
pub use posts_query::{PostWithOwner, PostsQuery};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::UsersCommand;
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::{UserWithPosts, UsersQuery};
