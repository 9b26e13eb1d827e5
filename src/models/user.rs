use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered account. Created at registration and immutable thereafter;
/// there are no update or delete endpoints for users.
///
/// The password hash is deliberately not part of this struct, so a `User`
/// can never be serialized with credential material in it.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Credential row fetched during login. Never serialized.
#[derive(Debug, FromRow)]
pub struct UserCredentials {
    pub id: i32,
    pub password_hash: String,
}
