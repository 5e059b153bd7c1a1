use std::sync::Arc;

use async_trait::async_trait;
use planboard_result::{Context, DBError};

use crate::{ReferenceSqlDb, User, UserUpdate, UsersRepository};

#[async_trait()]
impl UsersRepository for ReferenceSqlDb {
  async fn users_create(&self, _ctx: Arc<Context>, user: &User) -> Result<(), DBError> {
    let mut users = self.users.lock().await;
    let path = "database.users.users_create";

    if users.contains_key(&user.id) {
      Err(DBError::exists(path, "user already exists"))
    } else {
      users.insert(user.id.to_string(), user.clone());
      Ok(())
    }
  }

  async fn users_get_by_id(&self, _ctx: Arc<Context>, user_id: &str) -> Result<User, DBError> {
    let users = self.users.lock().await;
    let path = "database.users.users_get_by_id";

    match users.get(user_id) {
      Some(user) => Ok(user.clone()),
      None => Err(DBError::not_found(path, "user is not exists")),
    }
  }

  async fn users_update(&self, _ctx: Arc<Context>, update: &UserUpdate) -> Result<(), DBError> {
    let mut users = self.users.lock().await;
    let path = "database.users.users_update";

    if let Some(existing) = users.get_mut(&update.id) {
      if let Some(email) = &update.email {
        existing.email = email.clone();
      }
      existing.name = update.name.clone();
      existing.image_url = update.image_url.clone();
      existing.updated_at = update.updated_at;
      Ok(())
    } else {
      Err(DBError::not_found(path, "user is not exists"))
    }
  }

  async fn users_delete(&self, _ctx: Arc<Context>, user_id: &str) -> Result<(), DBError> {
    let mut users = self.users.lock().await;
    let path = "database.users.users_delete";

    match users.remove(user_id) {
      Some(_) => Ok(()),
      None => Err(DBError::not_found(path, "user is not exists")),
    }
  }
}
