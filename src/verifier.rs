//! Credential derivation and verification
//!
//! Uses Argon2id with a per-user random salt. Derivation is pure and
//! deterministic for a given (raw secret, salt) pair; raw secrets are never
//! persisted or logged.

use argon2::{Algorithm, Argon2, Params, Version};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::{Error, Result};

/// Salt length in bytes for newly derived secrets
pub const SALT_LENGTH: usize = 16;

/// Output digest length in bytes
pub const DIGEST_LENGTH: usize = 32;

/// Derivation cost parameters
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Memory cost in KiB
    pub memory_cost: u32,
    /// Number of iterations
    pub time_cost: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            memory_cost: 64 * 1024, // 64 MiB
            time_cost: 3,
            parallelism: 4,
        }
    }
}

/// Salted, one-way digest of a raw secret. Safe to store and compare without
/// revealing the original; no inverse operation exists in this crate.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiableSecret {
    salt: Vec<u8>,
    digest: Vec<u8>,
}

impl VerifiableSecret {
    /// Reconstruct a stored representation from its parts, e.g. when loading
    /// from external storage
    pub fn from_parts(salt: Vec<u8>, digest: Vec<u8>) -> Self {
        Self { salt, digest }
    }

    /// The per-user salt this secret was derived with
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// The derived digest
    pub fn digest(&self) -> &[u8] {
        &self.digest
    }
}

// Debug must not print digest material
impl std::fmt::Debug for VerifiableSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifiableSecret")
            .field("salt_len", &self.salt.len())
            .field("digest_len", &self.digest.len())
            .finish()
    }
}

/// Credential verifier backed by Argon2id
pub struct CredentialVerifier {
    config: VerifierConfig,
}

impl Default for CredentialVerifier {
    fn default() -> Self {
        Self::new(VerifierConfig::default())
    }
}

impl CredentialVerifier {
    /// Create a new verifier with the given cost parameters
    pub fn new(config: VerifierConfig) -> Self {
        Self { config }
    }

    fn hasher(&self) -> Result<Argon2<'static>> {
        let params = Params::new(
            self.config.memory_cost,
            self.config.time_cost,
            self.config.parallelism,
            Some(DIGEST_LENGTH),
        )
        .map_err(|e| Error::Crypto(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Derive a verifiable secret from a raw secret and an explicit salt.
    ///
    /// Deterministic: identical inputs always produce an identical digest.
    pub fn derive(&self, raw_secret: &str, salt: &[u8]) -> Result<VerifiableSecret> {
        if raw_secret.is_empty() {
            return Err(Error::InvalidParameter("raw secret must not be empty".into()));
        }
        if salt.len() < 8 {
            return Err(Error::InvalidParameter("salt must be at least 8 bytes".into()));
        }

        let mut digest = vec![0u8; DIGEST_LENGTH];
        self.hasher()?
            .hash_password_into(raw_secret.as_bytes(), salt, &mut digest)
            .map_err(|e| Error::Crypto(e.to_string()))?;

        Ok(VerifiableSecret {
            salt: salt.to_vec(),
            digest,
        })
    }

    /// Derive with a freshly generated per-user random salt.
    ///
    /// This is the enrollment path; the salt is stored inside the returned
    /// [`VerifiableSecret`] alongside the digest.
    pub fn derive_new(&self, raw_secret: &str) -> Result<VerifiableSecret> {
        let mut salt = vec![0u8; SALT_LENGTH];
        OsRng.fill_bytes(&mut salt);
        self.derive(raw_secret, &salt)
    }

    /// Check a raw secret against a stored representation in constant time.
    pub fn matches(&self, raw_secret: &str, stored: &VerifiableSecret) -> Result<bool> {
        let candidate = self.derive(raw_secret, &stored.salt)?;
        Ok(candidate.digest.ct_eq(&stored.digest).into())
    }
}

/// One-shot check capability handed to a lookup gateway.
///
/// Bundles the caller's raw secret with the verifier so the gateway can test
/// it against a stored [`VerifiableSecret`] without the raw secret or the
/// stored digest ever crossing back over the gateway boundary. The raw secret
/// is zeroed on drop.
pub struct SecretProof<'a> {
    raw: Zeroizing<String>,
    verifier: &'a CredentialVerifier,
}

impl<'a> SecretProof<'a> {
    /// Create a proof for one lookup. The dispatcher builds this after input
    /// validation; the raw secret is already known to be non-empty.
    pub fn new(raw_secret: &str, verifier: &'a CredentialVerifier) -> Self {
        Self {
            raw: Zeroizing::new(raw_secret.to_owned()),
            verifier,
        }
    }

    /// Test the carried raw secret against a stored representation.
    pub fn matches(&self, stored: &VerifiableSecret) -> Result<bool> {
        self.verifier.matches(&self.raw, stored)
    }
}

impl std::fmt::Debug for SecretProof<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretProof(..)")
    }
}
