//! User validation against the external user service.
//!
//! The sales service only needs to know whether a user exists. Anything short
//! of a definitive answer is surfaced as an error so callers never treat an
//! unreachable service as "user confirmed".

pub mod http;
pub mod in_memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use salesdesk_core::UserId;

pub use http::HttpUserDirectory;
pub use in_memory::InMemoryUserDirectory;

/// Minimal user representation returned by the user service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserLookupError {
    /// The user service definitively reported the user as absent.
    #[error("user not found: {0}")]
    NotFound(UserId),

    #[error("user service unreachable: {0}")]
    Transport(String),

    #[error("user service returned unexpected status ({status}): {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("failed to decode user service response: {0}")]
    Decode(String),
}

impl UserLookupError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, UserLookupError::NotFound(_))
    }
}

/// Resolves user identifiers against the user service.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn resolve(&self, user_id: &UserId) -> Result<User, UserLookupError>;
}

#[async_trait]
impl<U> UserDirectory for Arc<U>
where
    U: UserDirectory + ?Sized,
{
    async fn resolve(&self, user_id: &UserId) -> Result<User, UserLookupError> {
        (**self).resolve(user_id).await
    }
}
