use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Admins created through the API get a proper argon2 PHC string.
pub fn hash_password(password: &str) -> String {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string()
}

fn is_sha256_hex(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Checks a submitted password against whatever format the stored credential
/// happens to be in. The column carries no format discriminator, so the
/// strategies run in order and the first definite match wins:
///
/// 1. 64 hex chars — treated as a raw sha256 digest (the seeded format)
/// 2. PHC string — argon2 verification
/// 3. anything else — legacy plaintext, compared byte for byte
///
/// Callers must collapse every failure into the same generic rejection.
pub fn verify_credential(stored: &str, password: &str) -> bool {
    if is_sha256_hex(stored) {
        let digest = format!("{:x}", Sha256::digest(password.as_bytes()));
        let stored_lower = stored.to_lowercase();
        if bool::from(digest.as_bytes().ct_eq(stored_lower.as_bytes())) {
            return true;
        }
    }

    if let Ok(parsed) = PasswordHash::new(stored) {
        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
        {
            return true;
        }
    }

    bool::from(stored.as_bytes().ct_eq(password.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN123_SHA256: &str =
        "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9";

    #[test]
    fn sha256_stored_credential_matches() {
        assert!(verify_credential(ADMIN123_SHA256, "admin123"));
    }

    #[test]
    fn sha256_stored_credential_rejects_wrong_password() {
        assert!(!verify_credential(ADMIN123_SHA256, "wrong"));
    }

    #[test]
    fn argon2_stored_credential_round_trips() {
        let stored = hash_password("s3cret");
        assert!(verify_credential(&stored, "s3cret"));
        assert!(!verify_credential(&stored, "s3cret!"));
    }

    #[test]
    fn plaintext_fallback_still_works() {
        assert!(verify_credential("plaintext123", "plaintext123"));
        assert!(!verify_credential("plaintext123", "plaintext124"));
    }

    #[test]
    fn uppercase_digest_is_accepted() {
        assert!(verify_credential(&ADMIN123_SHA256.to_uppercase(), "admin123"));
    }
}
