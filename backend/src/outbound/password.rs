//! Argon2id implementation of the `PasswordHasher` port.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash as PhcString, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use tracing::debug;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Salted Argon2id hasher producing PHC strings.
///
/// Verification reads the parameters embedded in the stored string, so
/// changing the cost only affects newly registered users.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl Argon2PasswordHasher {
    /// Hasher with explicit cost parameters.
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| PasswordHashError::hashing(err.to_string()))?;
        PasswordHash::new(phc.to_string())
            .map_err(|err| PasswordHashError::hashing(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> bool {
        let parsed = match PhcString::new(hash.as_str()) {
            Ok(parsed) => parsed,
            Err(error) => {
                debug!(%error, "stored password hash is not a PHC string");
                return false;
            }
        };
        self.argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::with_params(Params::new(8, 1, 1, None).expect("params"))
    }

    #[rstest]
    fn hashes_verify_against_their_password(hasher: Argon2PasswordHasher) {
        let hash = hasher.hash("sekret").expect("hash");
        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(hasher.verify("sekret", &hash));
        assert!(!hasher.verify("sekret2", &hash));
    }

    #[rstest]
    fn salts_differ_between_hashes(hasher: Argon2PasswordHasher) {
        let first = hasher.hash("sekret").expect("hash");
        let second = hasher.hash("sekret").expect("hash");
        assert_ne!(first.as_str(), second.as_str());
    }

    #[rstest]
    fn malformed_hashes_never_match(hasher: Argon2PasswordHasher) {
        let bogus = PasswordHash::new("not-a-phc-string").expect("non-empty");
        assert!(!hasher.verify("sekret", &bogus));
    }

    #[rstest]
    fn verification_uses_the_stored_parameters(hasher: Argon2PasswordHasher) {
        let hash = hasher.hash("sekret").expect("hash");
        let stronger = Argon2PasswordHasher::with_params(Params::new(16, 2, 1, None).expect("params"));
        assert!(stronger.verify("sekret", &hash));
    }
}
