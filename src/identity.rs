//! Sign-in. The engine only needs the current uid and whether the email is
//! verified; everything else here is for the host.

use crate::core::constants::MIN_PASSWORD_LEN;
use crate::error::AuthError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Federated providers `LocalIdentity` accepts.
pub const SUPPORTED_PROVIDERS: [&str; 2] = ["google", "github"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub email_verified: bool,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str, display_name: Option<&str>) -> Result<User, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError>;

    async fn sign_in_with_provider(&self, provider: &str) -> Result<User, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    async fn send_verification_email(&self) -> Result<(), AuthError>;

    async fn current_user(&self) -> Option<User>;
}

struct Account {
    user: User,
    salt: String,
    digest: Option<[u8; 32]>,
}

/// In-process accounts with salted SHA-256 password digests.
#[derive(Default)]
pub struct LocalIdentity {
    accounts: Mutex<HashMap<String, Account>>,
    current: Mutex<Option<String>>,
    /// Addresses a verification email was "sent" to, in order.
    outbox: Mutex<Vec<String>>,
}

fn password_digest(salt: &str, password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

/// Local uids are derived from the email so a persisted store finds the same
/// record on every run.
fn local_uid(email: &str) -> String {
    let digest = Sha256::digest(email.as_bytes());
    digest.iter().take(14).map(|b| format!("{b:02x}")).collect()
}

fn normalize(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

impl LocalIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an account verified, as if the emailed link had been followed.
    pub async fn confirm_email(&self, email: &str) -> Result<(), AuthError> {
        let mut accounts = self.accounts.lock().await;
        let account = accounts
            .get_mut(&normalize(email))
            .ok_or(AuthError::InvalidCredentials)?;
        account.user.email_verified = true;
        Ok(())
    }

    pub async fn sent_verifications(&self) -> Vec<String> {
        self.outbox.lock().await.clone()
    }

    async fn login(&self, key: &str) -> Result<User, AuthError> {
        let mut accounts = self.accounts.lock().await;
        let account = accounts.get_mut(key).ok_or(AuthError::InvalidCredentials)?;
        account.user.last_login_at = Utc::now();
        let user = account.user.clone();
        drop(accounts);
        *self.current.lock().await = Some(key.to_string());
        log::debug!("signed in {}", user.uid);
        Ok(user)
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentity {
    async fn sign_up(&self, email: &str, password: &str, display_name: Option<&str>) -> Result<User, AuthError> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword(MIN_PASSWORD_LEN));
        }
        let key = normalize(email);
        {
            let mut accounts = self.accounts.lock().await;
            if accounts.contains_key(&key) {
                return Err(AuthError::EmailInUse(key));
            }
            let now = Utc::now();
            let salt = Uuid::new_v4().to_string();
            let digest = password_digest(&salt, password);
            let user = User {
                uid: local_uid(&key),
                email: key.clone(),
                display_name: display_name.map(str::to_string),
                email_verified: false,
                photo_url: None,
                created_at: now,
                last_login_at: now,
            };
            log::info!("created account {} for {}", user.uid, key);
            accounts.insert(
                key.clone(),
                Account {
                    user,
                    salt,
                    digest: Some(digest),
                },
            );
        }
        self.login(&key).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let key = normalize(email);
        {
            let accounts = self.accounts.lock().await;
            let account = accounts.get(&key).ok_or(AuthError::InvalidCredentials)?;
            let Some(expected) = account.digest else {
                return Err(AuthError::InvalidCredentials);
            };
            if password_digest(&account.salt, password) != expected {
                return Err(AuthError::InvalidCredentials);
            }
        }
        self.login(&key).await
    }

    async fn sign_in_with_provider(&self, provider: &str) -> Result<User, AuthError> {
        let provider = provider.to_ascii_lowercase();
        if !SUPPORTED_PROVIDERS.contains(&provider.as_str()) {
            return Err(AuthError::UnknownProvider(provider));
        }
        let key = format!("player@{provider}.local");
        {
            let mut accounts = self.accounts.lock().await;
            accounts.entry(key.clone()).or_insert_with(|| {
                let now = Utc::now();
                Account {
                    user: User {
                        uid: local_uid(&key),
                        email: key.clone(),
                        display_name: Some(format!("{provider} player")),
                        email_verified: true,
                        photo_url: Some(format!("https://{provider}.local/avatar.png")),
                        created_at: now,
                        last_login_at: now,
                    },
                    salt: String::new(),
                    digest: None,
                }
            });
        }
        self.login(&key).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let previous = self.current.lock().await.take();
        previous.map(|_| ()).ok_or(AuthError::NoCurrentUser)
    }

    async fn send_verification_email(&self) -> Result<(), AuthError> {
        let user = self.current_user().await.ok_or(AuthError::NoCurrentUser)?;
        log::info!("verification email sent to {}", user.email);
        self.outbox.lock().await.push(user.email);
        Ok(())
    }

    async fn current_user(&self) -> Option<User> {
        let key = self.current.lock().await.clone()?;
        self.accounts.lock().await.get(&key).map(|a| a.user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_up_signs_in_unverified() {
        let identity = LocalIdentity::new();
        let user = identity.sign_up("Pilot@Example.com", "hunter22", Some("Pilot")).await.unwrap();
        assert_eq!(user.email, "pilot@example.com");
        assert!(!user.email_verified);
        assert_eq!(identity.current_user().await.unwrap().uid, user.uid);
    }

    #[tokio::test]
    async fn test_duplicate_and_weak() {
        let identity = LocalIdentity::new();
        identity.sign_up("a@b.c", "secret1", None).await.unwrap();
        assert!(matches!(
            identity.sign_up("A@B.C", "secret1", None).await,
            Err(AuthError::EmailInUse(_))
        ));
        assert_eq!(
            identity.sign_up("x@y.z", "short", None).await,
            Err(AuthError::WeakPassword(MIN_PASSWORD_LEN))
        );
    }

    #[tokio::test]
    async fn test_sign_in_checks_password() {
        let identity = LocalIdentity::new();
        let created = identity.sign_up("a@b.c", "secret1", None).await.unwrap();
        identity.sign_out().await.unwrap();
        assert!(identity.current_user().await.is_none());

        assert_eq!(
            identity.sign_in("a@b.c", "wrong!!").await,
            Err(AuthError::InvalidCredentials)
        );
        let user = identity.sign_in("a@b.c", "secret1").await.unwrap();
        assert_eq!(user.uid, created.uid);
    }

    #[tokio::test]
    async fn test_provider_accounts_are_verified() {
        let identity = LocalIdentity::new();
        let first = identity.sign_in_with_provider("Google").await.unwrap();
        assert!(first.email_verified);
        let again = identity.sign_in_with_provider("google").await.unwrap();
        assert_eq!(first.uid, again.uid);
        assert!(matches!(
            identity.sign_in_with_provider("myspace").await,
            Err(AuthError::UnknownProvider(_))
        ));
    }

    #[tokio::test]
    async fn test_provider_account_rejects_password_login() {
        let identity = LocalIdentity::new();
        identity.sign_in_with_provider("github").await.unwrap();
        assert_eq!(
            identity.sign_in("player@github.local", "anything").await,
            Err(AuthError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn test_verification_flow() {
        let identity = LocalIdentity::new();
        assert_eq!(identity.send_verification_email().await, Err(AuthError::NoCurrentUser));
        identity.sign_up("a@b.c", "secret1", None).await.unwrap();
        identity.send_verification_email().await.unwrap();
        assert_eq!(identity.sent_verifications().await, vec!["a@b.c".to_string()]);
        identity.confirm_email("a@b.c").await.unwrap();
        assert!(identity.current_user().await.unwrap().email_verified);
    }

    #[tokio::test]
    async fn test_uid_is_stable_per_email() {
        let a = LocalIdentity::new().sign_up("a@b.c", "secret1", None).await.unwrap();
        let b = LocalIdentity::new().sign_up("A@B.C", "other-pass", None).await.unwrap();
        assert_eq!(a.uid, b.uid);
        assert_eq!(a.uid.len(), 28);
    }

    #[tokio::test]
    async fn test_sign_out_without_user() {
        let identity = LocalIdentity::new();
        assert_eq!(identity.sign_out().await, Err(AuthError::NoCurrentUser));
    }
}
