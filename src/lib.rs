//! # Credence
//!
//! A multi-strategy authentication core: a uniform dispatch surface over
//! heterogeneous authentication strategies (federated providers and direct
//! credential submission) that always produces one normalized outcome.
//!
//! ## Features
//!
//! - **Provider registry**: named strategies registered once at startup,
//!   frozen afterwards, safe under concurrent resolution
//! - **Credential verification**: Argon2id derivation with per-user random
//!   salts and constant-time comparison
//! - **Identity lookup gateway**: async seam to external user storage with a
//!   non-enumeration guarantee
//! - **Normalized outcomes**: every attempt ends in exactly one
//!   [`AuthOutcome`]; collaborator errors never cross the boundary
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use credence::{
//!     AuthConfig, CredentialInput, CredentialVerifier, Dispatcher,
//!     MemoryDirectory, NullExchange, UserRecord,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AuthConfig::from_json(r#"{
//!         "strategies": [
//!             { "kind": "credentials", "name": "credentials",
//!               "identifier_field": "email", "secret_field": "password" }
//!         ]
//!     }"#)?;
//!     let registry = Arc::new(config.build_registry()?);
//!
//!     let verifier = CredentialVerifier::default();
//!     let directory = MemoryDirectory::new();
//!     directory.enroll(UserRecord::new("u-1", "user@example.com"), "password", &verifier)?;
//!
//!     let dispatcher = Dispatcher::builder()
//!         .with_registry(registry)
//!         .with_verifier(verifier)
//!         .with_gateway(directory)
//!         .with_federated(NullExchange)
//!         .build()?;
//!
//!     let input = CredentialInput::new()
//!         .with("email", "user@example.com")
//!         .with("password", "password");
//!     let outcome = dispatcher.authenticate("credentials", &input).await;
//!     assert!(outcome.is_success());
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(rust_2018_idioms)]

/// Startup configuration for the provider registry
pub mod config;

/// Authentication dispatcher
pub mod dispatcher;

/// Error types for the library
pub mod error;

/// Identity lookup gateway
pub mod gateway;

/// Normalized authentication outcomes
pub mod outcome;

/// Provider registry
pub mod registry;

/// Session issuance
pub mod session;

/// Authentication strategies
pub mod strategy;

/// Credential derivation and verification
pub mod verifier;

// Re-export commonly used types
pub use config::{AuthConfig, StrategyDecl};
pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use error::{Error, Result};
pub use gateway::{IdentityGateway, Lookup, MemoryDirectory};
pub use outcome::{AuthOutcome, FailureKind};
pub use registry::{ProviderRegistry, ProviderRegistryBuilder};
pub use session::{InMemorySessionIssuer, Session, SessionConfig, SessionIssuer};
pub use strategy::{
    FederatedConfig, FederatedExchange, FederatedVerdict, FieldSchema, NullExchange, Strategy,
};
pub use verifier::{CredentialVerifier, SecretProof, VerifiableSecret, VerifierConfig};

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Identity resolved by a lookup: an opaque stable identifier plus profile
/// attributes. Owned by the external storage collaborator; the core holds it
/// only for the duration of one authentication attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Opaque stable identifier
    pub id: String,
    /// Login identifier (username or email)
    pub identifier: String,
    /// Display name
    pub display_name: Option<String>,
    /// Profile attributes
    pub attributes: HashMap<String, serde_json::Value>,
    /// Created timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl UserRecord {
    /// Create a record with an id and login identifier
    pub fn new(id: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            identifier: identifier.into(),
            display_name: None,
            attributes: HashMap::new(),
            created_at: chrono::Utc::now(),
        }
    }

    /// Set the display name
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Attach a profile attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }
}

/// Per-request credential input: field name to raw string value.
///
/// Values are zeroed when the input is dropped; the raw secret inside is
/// never logged or persisted by the core.
#[derive(Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct CredentialInput {
    fields: BTreeMap<String, String>,
}

// Debug must not print field values; inputs carry raw secrets
impl std::fmt::Debug for CredentialInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialInput")
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CredentialInput {
    /// Create an empty input
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field value
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Get a field value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Whether a field is present
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of supplied fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields were supplied
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Drop for CredentialInput {
    fn drop(&mut self) {
        for value in self.fields.values_mut() {
            value.zeroize();
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CredentialInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
