/// Password hashing module using Argon2id
///
/// Credentials are stored only as PHC-format Argon2id digests. Hashing cost
/// is a deliberate policy choice pinned by the constants below; verification
/// reads its parameters back out of the stored digest, so old hashes keep
/// verifying if the policy ever changes. Plaintext passwords exist only long
/// enough to be hashed or verified and are never logged.
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let digest = hash_password("super_secret_password_123")?;
///
/// assert!(verify_password("super_secret_password_123", &digest)?);
/// assert!(!verify_password("wrong_password", &digest)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params, ParamsBuilder, Version,
};

/// Memory cost in KiB (64 MB)
const M_COST_KIB: u32 = 65536;

/// Number of passes over memory
const T_COST: u32 = 3;

/// Degree of parallelism
const P_COST: u32 = 4;

/// Digest length in bytes
const OUTPUT_LEN: usize = 32;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

fn hashing_params() -> Result<Params, PasswordError> {
    ParamsBuilder::new()
        .m_cost(M_COST_KIB)
        .t_cost(T_COST)
        .p_cost(P_COST)
        .output_len(OUTPUT_LEN)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))
}

/// Hashes a password with a fresh random salt
///
/// Returns the digest as a PHC string, e.g.
///
/// ```text
/// $argon2id$v=19$m=65536,t=3,p=4$c2FsdHNhbHRzYWx0$...
/// ```
///
/// The salt comes from the OS RNG, so hashing the same password twice yields
/// two different digests.
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, hashing_params()?);

    let digest = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(digest.to_string())
}

/// Verifies a password against a stored PHC digest
///
/// A wrong password is `Ok(false)`, not an error; errors mean the stored
/// digest itself is unusable. The comparison inside argon2 is constant-time.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the stored digest cannot be
/// parsed, or `PasswordError::VerifyError` for other verification failures.
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let digest = hash_password("correct_password")?;
/// assert!(verify_password("correct_password", &digest)?);
/// # Ok(())
/// # }
/// ```
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    // Parameters come from the digest, not from the current policy
    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!(
            "Verification failed: {}",
            e
        ))),
    }
}
