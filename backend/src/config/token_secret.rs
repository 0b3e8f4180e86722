//! Token signing secret loading and fingerprinting.
//!
//! The secret is read from a file so it can be mounted from a secret store.
//! Debug builds, or an explicit opt-in, fall back to a random per-process
//! secret when the file is unreadable; tokens then die with the process.

use std::path::{Path, PathBuf};

use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::{Zeroize, Zeroizing};

/// Minimum accepted secret length in bytes.
pub const TOKEN_SECRET_MIN_LEN: usize = 32;

/// Length of the fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Build mode for secret validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate a missing secret file.
    Debug,
    /// Release builds require a readable secret unless explicitly opted out.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bloglist::config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Errors raised while loading the token secret.
#[derive(thiserror::Error, Debug)]
pub enum TokenSecretError {
    /// Reading the secret file failed and no fallback was permitted.
    #[error("failed to read token secret at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The secret file is shorter than [`TOKEN_SECRET_MIN_LEN`].
    #[error("token secret at {path} too short: need >= {min_len} bytes, got {length}")]
    TooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Loaded secret bytes and where they came from.
pub struct TokenSecret {
    pub bytes: Zeroizing<Vec<u8>>,
    /// `true` when the secret was generated for this process only.
    pub ephemeral: bool,
}

/// Read the signing secret at `path`.
///
/// A trailing newline, as left by most editors and `echo`, is not part of
/// the secret.
pub fn load_token_secret(
    path: &Path,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<TokenSecret, TokenSecretError> {
    match std::fs::read(path) {
        Ok(mut bytes) => {
            while bytes.last().is_some_and(|byte| matches!(byte, b'\n' | b'\r')) {
                bytes.pop();
            }
            let length = bytes.len();
            if length < TOKEN_SECRET_MIN_LEN {
                bytes.zeroize();
                return Err(TokenSecretError::TooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: TOKEN_SECRET_MIN_LEN,
                });
            }
            Ok(TokenSecret {
                bytes: Zeroizing::new(bytes),
                ephemeral: false,
            })
        }
        Err(error) => {
            if mode.is_debug() || allow_ephemeral {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using temporary token secret (tokens will not survive restart)"
                );
                let mut bytes = Zeroizing::new(vec![0_u8; TOKEN_SECRET_MIN_LEN]);
                OsRng.fill_bytes(bytes.as_mut_slice());
                Ok(TokenSecret {
                    bytes,
                    ephemeral: true,
                })
            } else {
                Err(TokenSecretError::Read {
                    path: path.to_path_buf(),
                    source: error,
                })
            }
        }
    }
}

/// Truncated SHA-256 fingerprint of the secret, safe to log.
///
/// # Examples
///
/// ```rust
/// use bloglist::config::secret_fingerprint;
///
/// let fp = secret_fingerprint(&[b'a'; 32]);
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn secret_fingerprint(secret: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret);
    let result = hasher.finalize();
    hex::encode(&result[..FINGERPRINT_BYTES])
}
