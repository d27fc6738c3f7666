//! Authentication request/response types and the client session record.

use serde::{Deserialize, Serialize};

use crate::user::User;

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Login name.
    pub username: String,
    /// Plaintext password (sent over the transport only; never stored).
    pub password: String,
}

/// Request body for `POST /api/auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Desired login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Success response for `POST /api/auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer credential for subsequent calls.
    pub access_token: String,
    /// The authenticated user.
    pub user: User,
}

/// An authenticated session: the bearer credential plus the user identity.
///
/// Created on login or registration, destroyed on logout or on any
/// rejected-credential response. The token (alone) is persisted across
/// restarts; the user record is re-fetched via `GET /api/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Bearer credential.
    pub access_token: String,
    /// The authenticated user.
    pub user: User,
}

impl From<LoginResponse> for Session {
    fn from(resp: LoginResponse) -> Self {
        Self {
            access_token: resp.access_token,
            user: resp.user,
        }
    }
}
