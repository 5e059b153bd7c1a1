use serde::{Deserialize, Serialize};

/// A user mirrored from the identity provider. The id is the provider's
/// subject id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
#[serde(rename_all = "snake_case")]
pub struct User {
  pub id: String,                // VARCHAR(64)
  pub email: String,             // VARCHAR(320) NOT NULL
  pub name: String,              // VARCHAR(256) NOT NULL
  pub image_url: Option<String>, // TEXT
  pub created_at: i64,           // BIGINT NOT NULL
  pub updated_at: i64,           // BIGINT NOT NULL
}

/// Profile changes for an existing user. A `None` email leaves the stored
/// address untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
  pub id: String,
  pub email: Option<String>,
  pub name: String,
  pub image_url: Option<String>,
  pub updated_at: i64,
}
