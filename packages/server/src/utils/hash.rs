use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

/// Hash a password with argon2id and a fresh random salt.
///
/// `time_cost` is the number of argon2 passes; memory and parallelism stay at
/// the crate defaults.
pub fn hash_password(password: &str, time_cost: u32) -> Result<String, argon2::password_hash::Error> {
    let params = Params::new(
        Params::DEFAULT_M_COST,
        time_cost,
        Params::DEFAULT_P_COST,
        None,
    )
    .map_err(argon2::password_hash::Error::from)?;
    let hasher = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let salt = SaltString::encode_b64(&rand::random::<[u8; 16]>())?;
    Ok(hasher.hash_password(password.as_bytes(), &salt)?.to_string())
}

/// Check a password against a stored PHC string. Parameters are read from the hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
