//! User model and store.

use std::sync::Arc;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rand::RngCore;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while creating accounts.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("username \"{0}\" is already taken")]
    DuplicateUsername(String),

    #[error("missing required field \"{0}\"")]
    MissingField(&'static str),

    #[error("password must be at least {0} characters")]
    WeakPassword(usize),

    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// A registered user.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip)]
    pub password_hash: String,
    pub email: String,
    pub name: String,
    pub active: bool,
}

impl User {
    /// Check `password` against the stored hash. A malformed hash never
    /// validates.
    pub fn valid_password(&self, password: &str) -> bool {
        match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!(user = %self.username, error = %e, "Stored password hash unreadable");
                false
            }
        }
    }
}

/// Registration form fields.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub name: String,
}

/// In-memory user store keyed by lowercase username, with an id index.
#[derive(Debug, Clone)]
pub struct UserStore {
    by_name: Arc<DashMap<String, User>>,
    /// User id to `by_name` key.
    by_id: Arc<DashMap<Uuid, String>>,
    min_password_length: usize,
}

impl UserStore {
    pub fn new(min_password_length: usize) -> Self {
        Self {
            by_name: Arc::new(DashMap::new()),
            by_id: Arc::new(DashMap::new()),
            min_password_length,
        }
    }

    /// Create an active user with a hashed password.
    pub fn register_user(&self, form: NewUser) -> Result<User, AccountError> {
        let username = form.username.trim();
        if username.is_empty() {
            return Err(AccountError::MissingField("username"));
        }
        if form.password.is_empty() {
            return Err(AccountError::MissingField("password"));
        }
        if form.password.chars().count() < self.min_password_length {
            return Err(AccountError::WeakPassword(self.min_password_length));
        }

        let key = username.to_lowercase();
        if self.by_name.contains_key(&key) {
            return Err(AccountError::DuplicateUsername(username.to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: hash_password(&form.password)?,
            email: form.email.trim().to_string(),
            name: form.name.trim().to_string(),
            active: true,
        };

        // Re-check under the shard lock; hashing above is slow.
        match self.by_name.entry(key.clone()) {
            Entry::Occupied(_) => Err(AccountError::DuplicateUsername(username.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                self.by_id.insert(user.id, key);
                tracing::info!(user_id = %user.id, username = %user.username, "User registered");
                Ok(user)
            }
        }
    }

    /// Look a user up by username, ignoring case.
    pub fn find_by_username(&self, username: &str) -> Option<User> {
        self.by_name
            .get(&username.trim().to_lowercase())
            .map(|u| u.value().clone())
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<User> {
        let key = self.by_id.get(&id)?.value().clone();
        self.by_name.get(&key).map(|u| u.value().clone())
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new(6)
    }
}

fn hash_password(password: &str) -> Result<String, AccountError> {
    let mut salt_bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| AccountError::Hash(e.to_string()))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AccountError::Hash(e.to_string()))
}
