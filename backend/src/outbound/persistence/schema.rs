//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts and their owned-post index.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Login handle, unique across all users.
        username -> Varchar,
        /// Display name.
        name -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Varchar,
        /// Identifiers of posts this user owns. Derived from `posts.owner_id`
        /// and repaired by the reconciler when the two diverge.
        post_ids -> Array<Uuid>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Blog posts. `owner_id` is authoritative for ownership.
    posts (id) {
        id -> Uuid,
        owner_id -> Uuid,
        title -> Varchar,
        author -> Varchar,
        url -> Varchar,
        likes -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, posts);
