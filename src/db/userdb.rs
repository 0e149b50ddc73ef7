use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::db::{map_unique_violation, DBClient, StoreError},
    models::usermodel::User,
};

#[async_trait]
pub trait UserExt: Send + Sync {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<User>, StoreError>;

    async fn save_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        is_realtor: bool,
    ) -> Result<User, StoreError>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<User>, StoreError> {
        let mut user: Option<User> = None;

        if let Some(user_id) = user_id {
            user = sqlx::query_as::<_, User>(
                r#"
                SELECT id, name, email, password, is_realtor, created_at, updated_at
                FROM users
                WHERE id = $1
                "#,
            )
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(email) = email {
            user = sqlx::query_as::<_, User>(
                r#"
                SELECT id, name, email, password, is_realtor, created_at, updated_at
                FROM users
                WHERE email = $1
                "#,
            )
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        }

        Ok(user)
    }

    async fn save_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        is_realtor: bool,
    ) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password, is_realtor)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password, is_realtor, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password)
        .bind(is_realtor)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, StoreError::DuplicateEmail))
    }
}
