use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::{
    entities::user,
    error::DataResult,
    models::{User, dedup_key},
};

#[derive(Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a user. A name whose key is taken fails on the unique index.
    pub async fn add(&self, name: &str) -> DataResult<User> {
        let model = user::ActiveModel {
            name: Set(name.to_string()),
            name_key: Set(dedup_key(name)),
            ..Default::default()
        };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn list_all(&self) -> DataResult<Vec<User>> {
        let users = user::Entity::find()
            .order_by_asc(user::Column::Name)
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;
        Ok(users)
    }

    pub async fn get(&self, user_id: i32) -> DataResult<Option<User>> {
        Ok(user::Entity::find_by_id(user_id).one(&self.db).await?)
    }

    /// Case-insensitive, whitespace-insensitive name match.
    pub async fn find_by_name(&self, name: &str) -> DataResult<Option<User>> {
        let user = user::Entity::find()
            .filter(user::Column::NameKey.eq(dedup_key(name)))
            .one(&self.db)
            .await?;
        Ok(user)
    }

    /// Deletes a user; their movies go with them via the foreign key.
    pub async fn delete(&self, user_id: i32) -> DataResult<bool> {
        let res = user::Entity::delete_by_id(user_id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}
