use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::ledger::Role;

#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub const PROFILE_COLUMNS: &str =
    "id, username, email, password_hash, role, phone, location, created_at";
