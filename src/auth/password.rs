use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

/// Minimum accepted password length at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Verify a password against a stored hash. A malformed hash counts as a
/// failed verification rather than an error.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    verify(password, password_hash).unwrap_or(false)
}

pub fn meets_length_requirement(password: &str) -> bool {
    password.len() >= MIN_PASSWORD_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_original_and_rejects_others() {
        // low cost keeps the test quick; verification is cost-agnostic
        let hashed = hash("rahasia", 4).unwrap();
        assert!(verify_password("rahasia", &hashed));
        assert!(!verify_password("rahasia2", &hashed));
        assert!(!verify_password("", &hashed));
    }

    #[test]
    fn malformed_hash_fails_verification() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }

    #[test]
    fn length_requirement_boundary() {
        assert!(!meets_length_requirement("12345"));
        assert!(meets_length_requirement("123456"));
    }
}
