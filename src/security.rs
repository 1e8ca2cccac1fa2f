//! Password hashing helpers.
//!
//! Argon2 is CPU bound, so every hash and verification runs on the blocking
//! thread pool instead of a runtime worker.

use std::sync::OnceLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;
use tokio::task;

#[derive(Debug, Error)]
pub enum SecurityError {
    #[error("failed to hash password: {0}")]
    Hashing(String),
    #[error("password hashing task failed")]
    Task(#[from] task::JoinError),
}

/// Hash a plaintext password into an Argon2 PHC string with a random salt.
pub async fn hash_password(plaintext: &str) -> Result<String, SecurityError> {
    let plaintext = plaintext.to_owned();
    task::spawn_blocking(move || hash_blocking(&plaintext)).await?
}

/// Check a plaintext password against a stored hash. Malformed hashes never verify.
///
/// Without a stored hash the password is checked against a throwaway hash and
/// rejected, so unknown accounts cost as much as wrong passwords.
pub async fn verify_password(plaintext: &str, hashed: Option<&str>) -> Result<bool, SecurityError> {
    let plaintext = plaintext.to_owned();
    let hashed = hashed.map(str::to_owned);
    let verified = task::spawn_blocking(move || match hashed {
        Some(hashed) => verify_blocking(&plaintext, &hashed),
        None => {
            if let Some(dummy) = dummy_hash() {
                verify_blocking(&plaintext, dummy);
            }
            false
        }
    })
    .await?;
    Ok(verified)
}

fn hash_blocking(plaintext: &str) -> Result<String, SecurityError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| SecurityError::Hashing(err.to_string()))
}

fn verify_blocking(plaintext: &str, hashed: &str) -> bool {
    match PasswordHash::new(hashed) {
        Ok(parsed) => Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Hash used when the account does not exist, computed once per process.
fn dummy_hash() -> Option<&'static str> {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();
    DUMMY
        .get_or_init(|| hash_blocking("artemis-unknown-account").ok())
        .as_deref()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hashes_verify_only_the_original_password() {
        let hashed = hash_password("secret").await.unwrap();
        assert_ne!(hashed, "secret");
        assert!(verify_password("secret", Some(&hashed)).await.unwrap());
        assert!(!verify_password("Secret", Some(&hashed)).await.unwrap());
    }

    #[tokio::test]
    async fn salts_differ_between_hashes() {
        assert_ne!(
            hash_password("secret").await.unwrap(),
            hash_password("secret").await.unwrap()
        );
    }

    #[tokio::test]
    async fn malformed_hash_does_not_verify() {
        assert!(!verify_password("secret", Some("not-a-phc-string")).await.unwrap());
    }

    #[tokio::test]
    async fn missing_hash_still_runs_a_full_verification() {
        assert!(!verify_password("artemis-unknown-account", None).await.unwrap());
        let dummy = dummy_hash().unwrap();
        assert!(PasswordHash::new(dummy).is_ok());
    }
}
