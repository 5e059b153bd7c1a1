use serde::{Deserialize, Serialize};

/// A workspace mirrored from an identity-provider organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
#[serde(rename_all = "snake_case")]
pub struct Workspace {
  pub id: String,                // VARCHAR(64)
  pub name: String,              // VARCHAR(256) NOT NULL
  pub slug: String,              // VARCHAR(256) NOT NULL
  pub image_url: Option<String>, // TEXT
  pub created_at: i64,           // BIGINT NOT NULL
  pub updated_at: i64,           // BIGINT NOT NULL
}
