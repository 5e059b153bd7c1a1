use std::sync::Arc;

use async_trait::async_trait;
use planboard_result::{Context, DBError, ErrorType};

use crate::{drivers::sqlx_error, PostgresDb, User, UserUpdate, UsersRepository};

#[async_trait()]
impl UsersRepository for PostgresDb {
  async fn users_create(&self, _ctx: Arc<Context>, user: &User) -> Result<(), DBError> {
    let path = "database.users.users_create";

    sqlx::query(
      "INSERT INTO users (id, email, name, image_url, created_at, updated_at)
       VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(&user.id)
    .bind(&user.email)
    .bind(&user.name)
    .bind(&user.image_url)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(self.db())
    .await
    .map_err(|err| sqlx_error(err, path, ErrorType::DBInsertError, "failed to create user"))?;

    Ok(())
  }

  async fn users_get_by_id(&self, _ctx: Arc<Context>, user_id: &str) -> Result<User, DBError> {
    let path = "database.users.users_get_by_id";

    let row = sqlx::query_as::<_, User>(
      "SELECT id, email, name, image_url, created_at, updated_at FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(self.db())
    .await
    .map_err(|err| sqlx_error(err, path, ErrorType::DBSelectError, "failed to fetch user"))?;

    row.ok_or_else(|| DBError::not_found(path, "user not found"))
  }

  async fn users_update(&self, _ctx: Arc<Context>, update: &UserUpdate) -> Result<(), DBError> {
    let path = "database.users.users_update";

    let result = sqlx::query(
      "UPDATE users SET email = COALESCE($2, email), name = $3, image_url = $4, updated_at = $5
       WHERE id = $1",
    )
    .bind(&update.id)
    .bind(&update.email)
    .bind(&update.name)
    .bind(&update.image_url)
    .bind(update.updated_at)
    .execute(self.db())
    .await
    .map_err(|err| sqlx_error(err, path, ErrorType::DBUpdateError, "failed to update user"))?;

    if result.rows_affected() == 0 {
      return Err(DBError::not_found(path, "user not found"));
    }
    Ok(())
  }

  async fn users_delete(&self, _ctx: Arc<Context>, user_id: &str) -> Result<(), DBError> {
    let path = "database.users.users_delete";

    let result = sqlx::query("DELETE FROM users WHERE id = $1")
      .bind(user_id)
      .execute(self.db())
      .await
      .map_err(|err| sqlx_error(err, path, ErrorType::DBDeleteError, "failed to delete user"))?;

    if result.rows_affected() == 0 {
      return Err(DBError::not_found(path, "user not found"));
    }
    Ok(())
  }
}
