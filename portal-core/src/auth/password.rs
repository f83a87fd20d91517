//! Password storage schemes

use crate::error::{PortalError, PortalResult};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How passwords are written to and checked against the user map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordScheme {
    /// Stored verbatim, compared by exact string equality
    #[default]
    Plaintext,

    /// Salted Argon2 PHC string. Stored values that are not PHC strings
    /// (e.g. accounts written under `Plaintext`) still compare verbatim.
    Argon2,
}

impl PasswordScheme {
    /// Encode a password for storage
    pub fn encode(&self, password: &str) -> PortalResult<String> {
        match self {
            PasswordScheme::Plaintext => Ok(password.to_string()),
            PasswordScheme::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map(|hash| hash.to_string())
                    .map_err(|e| PortalError::PasswordHash(e.to_string()))
            }
        }
    }

    /// Check a login attempt against the stored value
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        match self {
            PasswordScheme::Plaintext => stored == password,
            PasswordScheme::Argon2 => match PasswordHash::new(stored) {
                Ok(parsed) => Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok(),
                Err(_) => stored == password,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PasswordScheme::Plaintext => "plaintext",
            PasswordScheme::Argon2 => "argon2",
        }
    }
}

impl FromStr for PasswordScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plaintext" | "plain" => Ok(PasswordScheme::Plaintext),
            "argon2" => Ok(PasswordScheme::Argon2),
            other => Err(format!("unknown password scheme: {}", other)),
        }
    }
}

impl fmt::Display for PasswordScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plaintext_is_exact() {
        let scheme = PasswordScheme::Plaintext;
        let stored = scheme.encode("admin123").unwrap();
        assert_eq!(stored, "admin123");
        assert!(scheme.verify("admin123", &stored));
        assert!(!scheme.verify("Admin123", &stored));
        assert!(!scheme.verify("admin123 ", &stored));
    }

    #[test]
    fn test_argon2_hashes_and_verifies() {
        let scheme = PasswordScheme::Argon2;
        let stored = scheme.encode("correct horse").unwrap();
        assert_ne!(stored, "correct horse");
        assert!(stored.starts_with("$argon2"));
        assert!(scheme.verify("correct horse", &stored));
        assert!(!scheme.verify("wrong horse", &stored));
    }

    #[test]
    fn test_argon2_salts_differ() {
        let scheme = PasswordScheme::Argon2;
        assert_ne!(scheme.encode("same").unwrap(), scheme.encode("same").unwrap());
    }

    #[test]
    fn test_argon2_accepts_legacy_plaintext() {
        assert!(PasswordScheme::Argon2.verify("admin123", "admin123"));
        assert!(!PasswordScheme::Argon2.verify("admin12", "admin123"));
    }

    #[test]
    fn test_plaintext_does_not_interpret_hashes() {
        let stored = PasswordScheme::Argon2.encode("pw123456").unwrap();
        assert!(!PasswordScheme::Plaintext.verify("pw123456", &stored));
    }

    #[test]
    fn test_parse() {
        assert_eq!("argon2".parse::<PasswordScheme>(), Ok(PasswordScheme::Argon2));
        assert_eq!("PLAINTEXT".parse::<PasswordScheme>(), Ok(PasswordScheme::Plaintext));
        assert!("md5".parse::<PasswordScheme>().is_err());
    }
}
