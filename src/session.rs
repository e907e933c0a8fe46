//! Explicit admin session passed to the components that talk to the API.
//!
//! A [`Session`] is created by the caller once it holds a token and hands it
//! to [`ApiClient`](crate::client::ApiClient) and anything else that needs
//! to know who is signed in. Nothing here reads or writes ambient storage.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PricingError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Admin,
}

/// The signed-in user, as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Bearer token plus the user it belongs to, once known.
#[derive(Clone, PartialEq)]
pub struct Session {
    token: String,
    user: Option<AdminUser>,
}

impl Session {
    /// Start a session from a bearer token. An empty token is rejected.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(PricingError::Unauthorized("empty session token".to_string()));
        }
        Ok(Self { token, user: None })
    }

    pub fn with_user(mut self, user: AdminUser) -> Self {
        self.user = Some(user);
        self
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user(&self) -> Option<&AdminUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// The session's user, provided it is an active administrator.
    pub fn require_admin(&self) -> Result<&AdminUser> {
        match &self.user {
            None => Err(PricingError::Unauthorized("not signed in".to_string())),
            Some(user) if user.role != Role::Admin => Err(PricingError::Unauthorized(format!(
                "{} is not an administrator",
                user.email
            ))),
            Some(user) if !user.is_active => Err(PricingError::Unauthorized(format!(
                "{} is deactivated",
                user.email
            ))),
            Some(user) => Ok(user),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}
