//! Hospital password hashing.

use bcrypt::BcryptError;

const BCRYPT_COST: u32 = 8;

pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    bcrypt::hash(password, BCRYPT_COST)
}

/// `Ok(false)` is the ordinary wrong-password outcome; `Err` means the stored
/// digest itself is unusable.
pub fn verify_password(password: &str, digest: &str) -> Result<bool, BcryptError> {
    bcrypt::verify(password, digest)
}

#[cfg(test)]
mod tests {
    use super::{hash_password, verify_password};

    #[test]
    fn accepts_the_hashed_password() {
        let digest = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &digest).unwrap());
    }

    #[test]
    fn rejects_a_different_password() {
        let digest = hash_password("hunter2").unwrap();
        assert!(!verify_password("hunter3", &digest).unwrap());
    }

    #[test]
    fn salts_hashes() {
        assert_ne!(
            hash_password("hunter2").unwrap(),
            hash_password("hunter2").unwrap()
        );
    }

    #[test]
    fn broken_digest_is_an_error_not_a_mismatch() {
        assert!(verify_password("hunter2", "not a bcrypt digest").is_err());
    }
}
