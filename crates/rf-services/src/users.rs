use std::sync::Arc;

use rf_core::{AddedUser, AppError, AuthProvider, LoginUser, NewUser, RegisterUser, Result, UserRepo};
use serde_json::Value;

pub struct RegisterUserUseCase {
    users: Arc<dyn UserRepo>,
    auth: Arc<dyn AuthProvider>,
}

impl RegisterUserUseCase {
    pub fn new(users: Arc<dyn UserRepo>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { users, auth }
    }

    pub async fn execute(&self, payload: &Value) -> Result<AddedUser> {
        let RegisterUser { username, password, fullname } = RegisterUser::try_from(payload)?;
        self.users.verify_username_available(&username).await?;

        let password_hash = self.auth.hash_password(&password).await?;
        let user = self
            .users
            .add_user(&NewUser { username, fullname, password_hash })
            .await?;

        log::info!("registered user {} ({})", user.username, user.id);
        Ok(AddedUser {
            id: user.id,
            username: user.username,
            fullname: user.fullname,
        })
    }
}

pub struct LoginUserUseCase {
    users: Arc<dyn UserRepo>,
    auth: Arc<dyn AuthProvider>,
}

impl LoginUserUseCase {
    pub fn new(users: Arc<dyn UserRepo>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { users, auth }
    }

    /// Returns an access token for valid credentials.
    pub async fn execute(&self, payload: &Value) -> Result<String> {
        let LoginUser { username, password } = LoginUser::try_from(payload)?;
        let user = self.users.get_user_by_username(&username).await?;

        if !self.auth.verify_password(&password, &user.password_hash).await {
            return Err(AppError::Unauthorized("wrong credentials".to_string()));
        }
        self.auth.issue_token(&user.id)
    }
}
