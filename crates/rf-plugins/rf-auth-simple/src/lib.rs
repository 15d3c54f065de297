//! # rf-auth-simple
//!
//! Argon2-based implementation of `AuthProvider`.
//! Handles password hashing and HMAC-signed access tokens.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use rf_core::error::{AppError, Result};
use rf_core::traits::AuthProvider;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub struct SimpleAuthProvider {
    /// Keyed with the token secret; cloned per signature
    mac: HmacSha256,
    token_age: Duration,
}

impl SimpleAuthProvider {
    /// Accepts a secret (e.g., from an environment variable) and the token lifetime.
    pub fn new(secret: &str, token_age_secs: i64) -> Self {
        Self {
            mac: HmacSha256::new_from_slice(secret.as_bytes())
                .expect("HMAC accepts any key length"),
            token_age: Duration::seconds(token_age_secs),
        }
    }

    fn sign(&self, payload: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

#[async_trait]
impl AuthProvider for SimpleAuthProvider {
    async fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| AppError::Internal(format!("password hashing failed: {err}")))
    }

    /// Verifies if a provided password matches a stored Argon2 hash.
    async fn verify_password(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(p) => p,
            Err(_) => return false,
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Token format: `base64(user_id:expires_at).hex(hmac_sha256(payload))`
    fn issue_token(&self, user_id: &str) -> Result<String> {
        let expires_at = (Utc::now() + self.token_age).timestamp();
        let payload = URL_SAFE_NO_PAD.encode(format!("{user_id}:{expires_at}"));
        let signature = self.sign(&payload);
        Ok(format!("{payload}.{signature}"))
    }

    fn verify_token(&self, token: &str) -> Option<String> {
        let (payload, signature) = token.split_once('.')?;

        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        mac.verify_slice(&hex::decode(signature).ok()?).ok()?;

        let decoded = String::from_utf8(URL_SAFE_NO_PAD.decode(payload).ok()?).ok()?;
        let (user_id, expires_at) = decoded.rsplit_once(':')?;
        if expires_at.parse::<i64>().ok()? < Utc::now().timestamp() {
            log::debug!("rejected expired token for {}", user_id);
            return None;
        }
        Some(user_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hashed_password_verifies() {
        let auth = SimpleAuthProvider::new("secret", 60);
        let hash = auth.hash_password("hunter2").await.unwrap();
        assert_ne!(hash, "hunter2");
        assert!(auth.verify_password("hunter2", &hash).await);
        assert!(!auth.verify_password("hunter3", &hash).await);
        assert!(!auth.verify_password("hunter2", "not-a-hash").await);
    }

    #[test]
    fn token_round_trips_user_id() {
        let auth = SimpleAuthProvider::new("secret", 60);
        let token = auth.issue_token("user-123").unwrap();
        assert_eq!(auth.verify_token(&token).as_deref(), Some("user-123"));
    }

    #[test]
    fn tampered_or_foreign_tokens_are_rejected() {
        let auth = SimpleAuthProvider::new("secret", 60);
        let token = auth.issue_token("user-123").unwrap();

        let other = SimpleAuthProvider::new("another secret", 60);
        assert_eq!(other.verify_token(&token), None);

        let (_, signature) = token.split_once('.').unwrap();
        let forged = format!("{}.{}", URL_SAFE_NO_PAD.encode("user-999:99999999999"), signature);
        assert_eq!(auth.verify_token(&forged), None);
        assert_eq!(auth.verify_token("garbage"), None);
    }

    #[test]
    fn empty_and_long_secrets_both_sign() {
        for secret in [String::new(), "k".repeat(512)] {
            let auth = SimpleAuthProvider::new(&secret, 60);
            let token = auth.issue_token("user-123").unwrap();
            assert_eq!(auth.verify_token(&token).as_deref(), Some("user-123"));
        }
    }

    #[test]
    fn expired_token_is_rejected() {
        let auth = SimpleAuthProvider::new("secret", -10);
        let token = auth.issue_token("user-123").unwrap();
        assert_eq!(auth.verify_token(&token), None);
    }
}
