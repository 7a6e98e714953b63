use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row of the `users` table.
///
/// Serialized with the field names the editor UI reads (`userId`, `isPro`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub external_id: String,
    pub email: String,
    pub name: String,
    pub is_pro: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pro_since: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Fields captured on first sync.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub external_id: String,
    pub email: String,
    pub name: String,
}
