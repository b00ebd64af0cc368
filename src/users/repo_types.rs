use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
///
/// Not `Serialize`: a row only leaves the crate as a
/// [`UserPublic`](super::dto::UserPublic).
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String, // Argon2 PHC string
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Fields supplied when inserting a user; id and timestamps are generated by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}
