//! User repository trait

use async_trait::async_trait;

use crate::domain::StoreError;

use super::entities::User;

#[async_trait]
pub trait IUserRepository: Send + Sync {
    async fn find(&self, id: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Insert or replace
    async fn update(&self, user: &User) -> Result<(), StoreError>;
}
