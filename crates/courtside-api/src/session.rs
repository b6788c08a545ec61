// Session lifecycle: hydrate from storage, login/register, logout, and the
// auth gate every write action goes through.

use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use courtside_core::models::{NewUser, User};
use courtside_core::storage::TokenStore;

use crate::endpoints::AuthApi;
use crate::error::ApiError;

const LOGIN_FAILED: &str = "login failed; check your credentials";

pub struct Session {
    auth: Arc<dyn AuthApi>,
    store: Arc<dyn TokenStore>,
    user: RwLock<Option<User>>,
}

impl Session {
    pub fn new(auth: Arc<dyn AuthApi>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            auth,
            store,
            user: RwLock::new(None),
        }
    }

    /// Restore the session from the stored token. A token the server no
    /// longer accepts is discarded and the session stays anonymous.
    pub async fn hydrate(&self) -> Result<Option<User>, ApiError> {
        let Some(token) = self.store.load().map_err(ApiError::Storage)? else {
            return Ok(None);
        };

        self.auth.set_bearer(Some(token));
        match self.auth.me().await {
            Ok(user) => {
                info!(user = %user.username, "session restored");
                self.set_user(Some(user.clone()));
                Ok(Some(user))
            }
            Err(e) => {
                warn!("stored token rejected, clearing: {e}");
                self.auth.set_bearer(None);
                self.store.clear().map_err(ApiError::Storage)?;
                self.set_user(None);
                Ok(None)
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        if email.trim().is_empty() {
            return Err(ApiError::invalid("email", "must not be empty"));
        }
        if password.is_empty() {
            return Err(ApiError::invalid("password", "must not be empty"));
        }

        let token = self
            .auth
            .login(email.trim(), password)
            .await
            .map_err(|e| match e {
                ApiError::Status { status, detail: None } => ApiError::Status {
                    status,
                    detail: Some(LOGIN_FAILED.to_string()),
                },
                other => other,
            })?;

        self.store
            .save(&token.access_token)
            .map_err(ApiError::Storage)?;
        self.auth.set_bearer(Some(token.access_token));

        match self.auth.me().await {
            Ok(user) => {
                info!(user = %user.username, "logged in");
                self.set_user(Some(user.clone()));
                Ok(user)
            }
            Err(e) => {
                // Token was issued but is unusable; do not keep half a session.
                self.auth.set_bearer(None);
                self.store.clear().map_err(ApiError::Storage)?;
                Err(e)
            }
        }
    }

    /// Create the account, then log in with the same credentials.
    pub async fn register(&self, new_user: &NewUser) -> Result<User, ApiError> {
        let created = self.auth.register(new_user).await?;
        info!(user = %created.username, "account created");
        self.login(&new_user.email, &new_user.password).await
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        let previous = self.current_user();
        self.set_user(None);
        self.auth.set_bearer(None);
        self.store.clear().map_err(ApiError::Storage)?;
        if let Some(user) = previous {
            info!(user = %user.username, "logged out");
        }
        Ok(())
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.read().expect("session lock poisoned").clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.read().expect("session lock poisoned").is_some()
    }

    /// The logged-in user, or `AuthRequired` naming the action. Never touches
    /// the network.
    pub fn require_user(&self, action: &str) -> Result<User, ApiError> {
        self.current_user()
            .ok_or_else(|| ApiError::auth_required(action))
    }

    /// Swap in a fresh copy of the user after a profile edit.
    pub fn replace_user(&self, user: User) {
        self.set_user(Some(user));
    }

    fn set_user(&self, user: Option<User>) {
        *self.user.write().expect("session lock poisoned") = user;
    }
}
