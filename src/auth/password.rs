use anyhow::anyhow;
use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

// Pinned so stored hashes keep verifying if the crate defaults move.
fn hasher() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default())
}

/// PHC-format argon2id hash with a fresh random salt per call.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher().hash_password(plain.as_bytes(), &salt).map_err(|e| {
        error!(error = %e, "password hashing failed");
        anyhow!("password hashing failed: {e}")
    })?;
    Ok(hash.to_string())
}

/// Hashes an optional replacement password, as carried by update bodies.
pub fn hash_if_present(plain: Option<&str>) -> anyhow::Result<Option<String>> {
    plain.map(hash_password).transpose()
}

/// `Ok(false)` on a wrong password. A stored value that is not a PHC hash is
/// an error, not a mismatch.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| {
        error!(error = %e, "stored password hash is malformed");
        anyhow!("malformed password hash: {e}")
    })?;
    match hasher().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => {
            error!(error = %e, "password verification failed");
            Err(anyhow!("password verification failed: {e}"))
        }
    }
}
