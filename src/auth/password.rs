//! Argon2id password hashing.

use crate::error::AppError;
use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};

/// Argon2id work factor.
///
/// Defaults follow the OWASP recommendation: m=19456 (19 MiB), t=2, p=1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        HashCost {
            memory_kib: 19456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl HashCost {
    pub fn params(&self) -> Result<Params, argon2::Error> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
    }
}

/// Hash a password into a PHC string with a fresh random salt.
///
/// The cost parameters are encoded in the output, so verification does not
/// need to know which `HashCost` produced it.
pub fn hash_password(password: &str, cost: HashCost) -> Result<String, AppError> {
    let params = cost
        .params()
        .map_err(|e| AppError::Internal(format!("Argon2 params: {}", e)))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Argon2 hash: {}", e)))?;

    Ok(hash.to_string())
}

/// Check a password against a stored PHC hash.
///
/// Returns false for a wrong password and for a stored hash that does not parse.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is malformed");
            return false;
        }
    };

    // Comparison is constant-time inside argon2
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
