use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Fresh random salt for a new credential.
pub fn generate_salt() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Hex SHA-256 of `salt || password`.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    let actual = hash_password(password, salt);
    constant_time_eq::constant_time_eq(actual.as_bytes(), expected_hash.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_depends_on_salt() {
        let a = hash_password("secret123", "salt-a");
        let b = hash_password("secret123", "salt-b");
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_verify_password() {
        let salt = generate_salt();
        let hash = hash_password("motdepasse", &salt);
        assert!(verify_password("motdepasse", &salt, &hash));
        assert!(!verify_password("motdepass", &salt, &hash));
        assert!(!verify_password("motdepasse", "other", &hash));
    }

    #[test]
    fn test_verify_rejects_malformed_digest() {
        let salt = generate_salt();
        let hash = hash_password("motdepasse", &salt);
        assert!(!verify_password("motdepasse", &salt, &hash[..32]));
        assert!(!verify_password("motdepasse", &salt, ""));
        assert!(!verify_password("motdepasse", &salt, &hash.to_uppercase()));
    }
}
