//! User model and DTOs.

use serde::Serialize;
use sqlx::FromRow;

use bugtrail_core::types::{DbId, Timestamp};

/// A user row from the `users` table.
///
/// `password_hash` is deliberately not serialized.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub company_id: DbId,
    pub role_id: DbId,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: Timestamp,
}

impl User {
    /// Display name used in history rows and member listings.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// DTO for inserting a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub company_id: DbId,
    pub role_id: DbId,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

/// A user joined with their role name, as exposed by member listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MemberRow {
    pub id: DbId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}
