//!
//! # Authentication Flow
//!
//! `Authenticator` moves the client between the two session states:
//!
//! * **Anonymous**: no token stored.
//! * **Authenticated**: token and user stored.
//!
//! Sign-up and sign-in enter the authenticated state; sign-out and a 401 from a
//! protected endpoint leave it.

use log::{debug, error, info, warn};
use std::sync::Arc;
use validator::Validate;

use super::AuthApi;
use crate::error::AppError;
use crate::models::user::name_from_email;
use crate::models::{AuthResponse, SignInRequest, SignUpRequest, User};
use crate::routes::{self, Navigator};
use crate::session::SessionStore;

pub struct Authenticator {
    api: Arc<dyn AuthApi>,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
}

impl Authenticator {
    pub fn new(api: Arc<dyn AuthApi>, session: SessionStore, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            api,
            session,
            navigator,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Registers a new account and signs it in.
    pub async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<User, AppError> {
        let request = SignUpRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        };
        request.validate()?;

        let auth = self.api.sign_up(&request).await.map_err(|e| {
            error!("Registration error: {}", e);
            e
        })?;
        let user = self.establish(&auth, email, name).await?;
        info!("Registered and signed in as {}", user.email);
        Ok(user)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, AppError> {
        let request = SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        request.validate()?;

        let auth = self.api.sign_in(&request).await.map_err(|e| {
            error!("Authentication error: {}", e);
            e
        })?;
        let user = self.establish(&auth, email, name_from_email(email)).await?;
        info!("Signed in as {}", user.email);
        Ok(user)
    }

    /// Stores the token, then the best user record available for it.
    ///
    /// If `/auth/me` cannot be reached a minimal record is built from the
    /// credentials the caller supplied.
    async fn establish(&self, auth: &AuthResponse, email: &str, name: &str) -> Result<User, AppError> {
        self.session.set_token(&auth.access_token)?;

        let user = match self.api.fetch_user(&auth.access_token).await {
            Ok(user) => user,
            Err(e) => {
                warn!("Could not fetch user details, using basic info: {}", e);
                User::basic(auth.resolved_user_id().unwrap_or_default(), email, name)
            }
        };
        self.session.set_user(&user)?;
        Ok(user)
    }

    /// Attempts the remote logout, then clears the local session whatever the outcome.
    pub async fn sign_out(&self) -> Result<(), AppError> {
        match self.session.token() {
            Ok(Some(token)) => {
                if let Err(e) = self.api.sign_out(&token).await {
                    warn!("Remote sign out failed, clearing local session anyway: {}", e);
                }
            }
            Ok(None) => debug!("No token stored; skipping remote sign out"),
            Err(e) => warn!("Could not read token before sign out: {}", e),
        }

        self.session.clear()?;
        info!("Signed out");
        Ok(())
    }

    /// Refreshes the cached user from the backend.
    ///
    /// When the refresh fails for any reason other than a rejected token, the
    /// last cached user is returned instead.
    pub async fn current_user(&self) -> Result<User, AppError> {
        let token = self.session.token()?.ok_or_else(|| {
            debug!("Error getting current user: no token");
            AppError::Unauthenticated("Not authenticated".into())
        })?;

        match self.api.fetch_user(&token).await {
            Ok(user) => {
                self.session.set_user(&user)?;
                Ok(user)
            }
            Err(e) if e.is_unauthorized() => {
                warn!("Stored token was rejected; signing out");
                if let Err(clear_err) = self.session.clear() {
                    error!("Failed to clear session after 401: {}", clear_err);
                }
                self.navigator.redirect(routes::SIGNIN);
                Err(e)
            }
            Err(e) => {
                warn!("Could not refresh user, using cached copy: {}", e);
                self.session
                    .user()?
                    .ok_or_else(|| AppError::Unauthenticated("Not authenticated".into()))
            }
        }
    }
}
