//! Configured user accounts.

use std::collections::HashMap;

use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::domain::{Role, SessionUser};

/// A user account from configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfiguredUser {
    /// User ID.
    pub id: u64,
    /// Login name.
    pub username: String,
    /// Password hash (SHA256 hex).
    pub password_hash: String,
    /// User role.
    pub role: Role,
}

impl ConfiguredUser {
    /// Verify a password against the stored hash.
    pub fn verify_password(&self, password: &str) -> bool {
        hash_password(password).eq_ignore_ascii_case(&self.password_hash)
    }

    pub fn session_user(&self) -> SessionUser {
        SessionUser {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
        }
    }
}

/// SHA256 hex digest of a password, the format stored in configuration.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// In-memory user store.
#[derive(Clone, Default)]
pub struct UserStore {
    by_username: HashMap<String, ConfiguredUser>,
    by_id: HashMap<u64, String>,
}

impl UserStore {
    /// Create a new user store from configured users.
    pub fn new(users: Vec<ConfiguredUser>) -> Self {
        let mut store = Self::default();
        for user in users {
            store.by_id.insert(user.id, user.username.clone());
            store.by_username.insert(user.username.clone(), user);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.by_username.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_username.is_empty()
    }

    /// Configured login names, sorted.
    pub fn usernames(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_username.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Find a user by login name.
    pub fn find_by_username(&self, username: &str) -> Option<&ConfiguredUser> {
        self.by_username.get(username)
    }

    /// Find a user by ID.
    pub fn find_by_id(&self, id: u64) -> Option<&ConfiguredUser> {
        self.by_id
            .get(&id)
            .and_then(|username| self.by_username.get(username))
    }

    /// Authenticate a user with username and password.
    ///
    /// Unknown users and wrong passwords are indistinguishable to the caller.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<&ConfiguredUser> {
        self.find_by_username(username)
            .filter(|user| user.verify_password(password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> UserStore {
        UserStore::new(vec![
            ConfiguredUser {
                id: 1,
                username: "admin".to_string(),
                password_hash: hash_password("password123"),
                role: Role::Admin,
            },
            ConfiguredUser {
                id: 7,
                username: "guest".to_string(),
                password_hash: hash_password("letmein"),
                role: Role::User,
            },
        ])
    }

    #[test]
    fn test_user_authentication() {
        let store = store();

        // Valid credentials
        assert!(store.authenticate("admin", "password123").is_some());

        // Wrong password
        assert!(store.authenticate("admin", "wrong").is_none());

        // Unknown user
        assert!(store.authenticate("unknown", "password123").is_none());

        // Empty input
        assert!(store.authenticate("", "").is_none());
    }

    #[test]
    fn test_lookup_by_id() {
        let store = store();
        assert_eq!(store.find_by_id(7).unwrap().username, "guest");
        assert!(store.find_by_id(2).is_none());
        assert_eq!(store.usernames(), vec!["admin", "guest"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_hash_is_case_insensitive_hex() {
        let user = ConfiguredUser {
            id: 1,
            username: "admin".to_string(),
            password_hash: hash_password("admin123").to_uppercase(),
            role: Role::Admin,
        };
        assert!(user.verify_password("admin123"));
    }
}
