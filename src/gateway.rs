//! Identity lookup gateway
//!
//! The gateway is the seam to external user storage. It performs at most one
//! read-only lookup per authentication attempt and reports "identifier
//! unknown" and "secret mismatch" as the same [`Lookup::NotFound`], so the
//! dispatcher never learns which sub-check failed.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::verifier::{
    CredentialVerifier, SecretProof, VerifiableSecret, DIGEST_LENGTH, SALT_LENGTH,
};
use crate::{Error, Result, UserRecord};

/// Result of one identity lookup
#[derive(Debug, Clone)]
pub enum Lookup {
    /// Identifier and secret both checked out
    Found(UserRecord),
    /// Identifier unknown, or secret mismatch; indistinguishable by design
    NotFound,
}

impl Lookup {
    /// Whether a record was resolved
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

/// Read-only lookup against external user storage.
///
/// Implementations may block or suspend on I/O; the dispatcher treats the
/// call as a single awaited step with no partial results. Infrastructure
/// failures are `Err` and are distinct from [`Lookup::NotFound`].
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Resolve an identifier plus secret proof to a user record.
    ///
    /// Must perform at most one storage lookup and must not mutate storage.
    async fn find(&self, identifier: &str, proof: &SecretProof<'_>) -> Result<Lookup>;
}

struct StoredUser {
    record: UserRecord,
    secret: VerifiableSecret,
}

/// In-memory user directory
///
/// Reference [`IdentityGateway`] implementation, also used by the test
/// suites. Enrollment derives a freshly salted secret per user.
pub struct MemoryDirectory {
    users: std::sync::RwLock<BTreeMap<String, StoredUser>>,
}

impl Default for MemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self {
            users: std::sync::RwLock::new(BTreeMap::new()),
        }
    }

    /// Enroll a user under its identifier with a freshly salted secret
    pub fn enroll(
        &self,
        record: UserRecord,
        raw_secret: &str,
        verifier: &CredentialVerifier,
    ) -> Result<()> {
        let secret = verifier.derive_new(raw_secret)?;
        let mut users = self.users.write().unwrap();

        if users.contains_key(&record.identifier) {
            return Err(Error::AlreadyExists(format!(
                "identifier {} already enrolled",
                record.identifier
            )));
        }

        users.insert(record.identifier.clone(), StoredUser { record, secret });
        Ok(())
    }

    /// Number of enrolled users
    pub fn len(&self) -> usize {
        self.users.read().unwrap().len()
    }

    /// Whether the directory is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl IdentityGateway for MemoryDirectory {
    async fn find(&self, identifier: &str, proof: &SecretProof<'_>) -> Result<Lookup> {
        if identifier.is_empty() {
            return Err(Error::InvalidParameter("identifier must not be empty".into()));
        }

        let users = self.users.read().unwrap();
        if let Some(stored) = users.get(identifier) {
            if proof.matches(&stored.secret)? {
                Ok(Lookup::Found(stored.record.clone()))
            } else {
                Ok(Lookup::NotFound)
            }
        } else {
            // An unknown identifier costs one derivation, same as a mismatch
            let decoy =
                VerifiableSecret::from_parts(vec![0u8; SALT_LENGTH], vec![0u8; DIGEST_LENGTH]);
            proof.matches(&decoy)?;
            Ok(Lookup::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verifier::VerifierConfig;

    fn test_verifier() -> CredentialVerifier {
        CredentialVerifier::new(VerifierConfig {
            memory_cost: 256,
            time_cost: 1,
            parallelism: 1,
        })
    }

    #[tokio::test]
    async fn test_enroll_and_find() {
        let verifier = test_verifier();
        let directory = MemoryDirectory::new();

        directory
            .enroll(
                UserRecord::new("u-1", "known@x.com"),
                "correct",
                &verifier,
            )
            .unwrap();
        assert_eq!(directory.len(), 1);

        let proof = SecretProof::new("correct", &verifier);
        let lookup = directory.find("known@x.com", &proof).await.unwrap();
        match lookup {
            Lookup::Found(user) => assert_eq!(user.id, "u-1"),
            Lookup::NotFound => panic!("expected record"),
        }
    }

    #[tokio::test]
    async fn test_unknown_and_mismatch_collapse_to_not_found() {
        let verifier = test_verifier();
        let directory = MemoryDirectory::new();
        directory
            .enroll(UserRecord::new("u-1", "known@x.com"), "correct", &verifier)
            .unwrap();

        let wrong = SecretProof::new("wrong", &verifier);
        let mismatch = directory.find("known@x.com", &wrong).await.unwrap();
        assert!(!mismatch.is_found());

        let any = SecretProof::new("anything", &verifier);
        let unknown = directory.find("unknown@x.com", &any).await.unwrap();
        assert!(!unknown.is_found());
    }

    #[tokio::test]
    async fn test_unknown_identifier_still_runs_derivation() {
        let verifier = test_verifier();
        let directory = MemoryDirectory::new();

        // An unverifiable proof surfaces the same derivation error on the
        // unknown branch as on the known branch
        let proof = SecretProof::new("", &verifier);
        let err = directory.find("nobody@x.com", &proof).await.unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn test_empty_identifier_is_error() {
        let verifier = test_verifier();
        let directory = MemoryDirectory::new();

        let proof = SecretProof::new("x", &verifier);
        let err = directory.find("", &proof).await.unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_duplicate_enrollment_rejected() {
        let verifier = test_verifier();
        let directory = MemoryDirectory::new();

        directory
            .enroll(UserRecord::new("u-1", "a@b.com"), "pw-one", &verifier)
            .unwrap();
        let err = directory
            .enroll(UserRecord::new("u-2", "a@b.com"), "pw-two", &verifier)
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
    }
}
