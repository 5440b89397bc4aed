use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{entity::{prelude::*, user}, error::{AppError, StoreContext as _}};

use super::{Lock, WithLock as _};

pub struct UserRepository<'c, C> {
    db: &'c C,
}

impl<'c, C: ConnectionTrait> UserRepository<'c, C> {
    pub fn new(db: &'c C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<user::Model>, AppError> {
        User::find_by_id(id)
            .one(self.db).await
            .context("UserRepository::find_by_id()")
    }

    /// `password` is the stored digest, not the plain text
    pub async fn find_by_credentials(&self, username: &str, password: &[u8]) -> Result<Option<user::Model>, AppError> {
        User::find()
            .filter(user::Column::Username.eq(username))
            .filter(user::Column::Password.eq(password))
            .one(self.db).await
            .context("UserRepository::find_by_credentials()")
    }

    /// Every user, oldest account first
    pub async fn find_all(&self, lock: Lock) -> Result<Vec<user::Model>, AppError> {
        User::find()
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Id)
            .with_lock(lock)
            .all(self.db).await
            .context("UserRepository::find_all()")
    }
}
