pub use bcrypt::BcryptResult;
use bcrypt::{hash, verify};

/// Cost factor for stored password hashes
pub const BCRYPT_COST: u32 = 10;

/// Hash a password using bcrypt
///
/// # Example
/// ```
/// use glow_utils::hash::bcrypt_hash;
///
/// let hashed = bcrypt_hash("my_password").unwrap();
/// assert!(hashed.starts_with("$2"));
/// ```
pub fn bcrypt_hash(password: &str) -> BcryptResult<String> {
    hash(password.as_bytes(), BCRYPT_COST)
}

/// Compare a plaintext password against a hashed password.
/// A malformed hash never matches.
///
/// # Example
/// ```
/// use glow_utils::hash::{bcrypt_hash, bcrypt_check};
///
/// let hash = bcrypt_hash("my_password").unwrap();
/// assert!(bcrypt_check("my_password", &hash));
/// assert!(!bcrypt_check("wrong_password", &hash));
/// ```
pub fn bcrypt_check(password: &str, hash: &str) -> bool {
    verify(password.as_bytes(), hash).unwrap_or(false)
}
