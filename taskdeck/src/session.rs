//! Session guard: owns the bearer credential and the authenticated
//! identity, and gates every authenticated call.
//!
//! Lifecycle: created on login/registration, restored from durable storage
//! on startup, destroyed on logout or on any rejected-credential response.
//! Destruction always clears the persisted credential so a later restart
//! cannot resurrect a dead session.

use taskdeck_api::auth::{Credentials, Registration, Session};

use crate::api::{ApiClient, ApiError};
use crate::storage::{Storage, StorageError};

/// Errors surfaced by login/registration.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The server rejected the credentials or registration data.
    #[error("{0}")]
    Rejected(String),

    /// The request never reached the server.
    #[error("connection error, please try again")]
    Network(#[source] ApiError),

    /// The credential could not be persisted or erased.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized(msg) | ApiError::Validation(msg) | ApiError::Server(msg) => {
                Self::Rejected(msg)
            }
            ApiError::NotFound => Self::Rejected("not found".to_string()),
            ApiError::Network(_) => Self::Network(err),
        }
    }
}

/// Holds the current session and mediates all credential state changes.
#[derive(Debug)]
pub struct SessionGuard {
    storage: Storage,
    session: Option<Session>,
}

impl SessionGuard {
    /// Creates a guard in the unauthenticated state.
    #[must_use]
    pub const fn new(storage: Storage) -> Self {
        Self {
            storage,
            session: None,
        }
    }

    /// Returns the current session, if authenticated.
    #[must_use]
    pub const fn current(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Attempts to restore a persisted session on startup.
    ///
    /// Reads the stored credential, attaches it to the client, and
    /// validates it via `GET /api/auth/me`. A rejected credential is
    /// erased; a network failure leaves it in place for the next attempt.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] when storage is unreadable or the validation
    /// call fails over the network.
    pub async fn restore(&mut self, api: &mut ApiClient) -> Result<bool, AuthError> {
        let Some(token) = self.storage.access_token()? else {
            return Ok(false);
        };
        api.set_token(Some(token.clone()));

        match api.me().await {
            Ok(user) => {
                self.session = Some(Session {
                    access_token: token,
                    user,
                });
                tracing::info!("restored persisted session");
                Ok(true)
            }
            Err(ApiError::Unauthorized(_)) => {
                tracing::info!("persisted credential rejected, clearing");
                self.end_session(api);
                Ok(false)
            }
            Err(e) => {
                api.set_token(None);
                Err(AuthError::Network(e))
            }
        }
    }

    /// Authenticates with username/password.
    ///
    /// On success the credential is persisted, attached to the client, and
    /// held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Rejected`] with the server's message for bad
    /// credentials, or [`AuthError::Network`]/[`AuthError::Storage`].
    pub async fn authenticate(
        &mut self,
        api: &mut ApiClient,
        username: &str,
        password: &str,
    ) -> Result<&Session, AuthError> {
        let creds = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let resp = api.login(&creds).await?;
        let session = Session::from(resp);

        self.storage
            .set_access_token(Some(&session.access_token))?;
        api.set_token(Some(session.access_token.clone()));
        tracing::info!(user = %session.user.username, "authenticated");

        self.session = Some(session);
        // Just inserted above.
        #[allow(clippy::unwrap_used)]
        Ok(self.session.as_ref().unwrap())
    }

    /// Registers a new account and then authenticates with it.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Rejected`] for duplicate usernames/emails or
    /// missing fields, or the authenticate-step errors.
    pub async fn register(
        &mut self,
        api: &mut ApiClient,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<&Session, AuthError> {
        let reg = Registration {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        api.register(&reg).await?;
        self.authenticate(api, username, password).await
    }

    /// Ends the session: erases the durable credential, clears the client
    /// token and the in-memory identity.
    ///
    /// Also the mandatory reaction to an authorization failure on any
    /// authenticated call. Storage failures during erase are logged, never
    /// fatal: the in-memory state is cleared regardless.
    pub fn end_session(&mut self, api: &mut ApiClient) {
        if let Err(e) = self.storage.set_access_token(None) {
            tracing::warn!(error = %e, "failed to erase persisted credential");
        }
        api.set_token(None);
        self.session = None;
        tracing::info!("session ended");
    }
}
