use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use salesdesk_core::UserId;

use super::{User, UserDirectory, UserLookupError};

/// In-memory user directory for tests/dev.
///
/// Can be switched to "unavailable" to simulate a user service outage, and
/// counts every lookup it serves.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<UserId, User>>,
    unavailable: AtomicBool,
    lookups: AtomicUsize,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, id: &str, name: &str) -> Self {
        self.insert(User {
            id: UserId::new(id),
            name: name.to_string(),
        });
        self
    }

    pub fn insert(&self, user: User) {
        if let Ok(mut users) = self.users.write() {
            users.insert(user.id.clone(), user);
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn resolve(&self, user_id: &UserId) -> Result<User, UserLookupError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(UserLookupError::Transport("user service unavailable".to_string()));
        }

        let users = self
            .users
            .read()
            .map_err(|_| UserLookupError::Transport("lock poisoned".to_string()))?;

        users
            .get(user_id)
            .cloned()
            .ok_or_else(|| UserLookupError::NotFound(user_id.clone()))
    }
}
