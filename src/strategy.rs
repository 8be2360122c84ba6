//! Authentication strategies
//!
//! A strategy is one pluggable method of proving identity: federated
//! (redirect-based, delegated to an external identity service) or direct
//! credential submission. Polymorphism is a tagged enum so no ad-hoc shape
//! differences leak between variants.

use async_trait::async_trait;

use serde::{Deserialize, Serialize};

use crate::{CredentialInput, Error, Result, UserRecord};

/// Required input fields for a credentials strategy.
///
/// The identifier field names the value used for the storage lookup (for
/// example `email`); the secret field names the raw secret (for example
/// `password`). Additional fields are required to be present but are opaque
/// to the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSchema {
    identifier_field: String,
    secret_field: String,
    #[serde(default)]
    additional_fields: Vec<String>,
}

impl FieldSchema {
    /// Create a schema with identifier and secret fields
    pub fn new(identifier_field: impl Into<String>, secret_field: impl Into<String>) -> Self {
        Self {
            identifier_field: identifier_field.into(),
            secret_field: secret_field.into(),
            additional_fields: Vec::new(),
        }
    }

    /// Require an additional field beyond identifier and secret
    pub fn with_field(mut self, name: impl Into<String>) -> Self {
        self.additional_fields.push(name.into());
        self
    }

    /// Name of the field holding the lookup identifier
    pub fn identifier_field(&self) -> &str {
        &self.identifier_field
    }

    /// Name of the field holding the raw secret
    pub fn secret_field(&self) -> &str {
        &self.secret_field
    }

    /// All required field names, in declaration order
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.identifier_field.as_str())
            .chain(std::iter::once(self.secret_field.as_str()))
            .chain(self.additional_fields.iter().map(String::as_str))
    }

    /// First declared field missing from `input`, if any. Extra fields in
    /// the input are ignored.
    pub fn missing_field<'s>(&'s self, input: &CredentialInput) -> Option<&'s str> {
        self.required_fields().find(|field| !input.contains(field))
    }

    /// Well-formedness check, run at registry construction
    pub fn validate(&self) -> Result<()> {
        if self.identifier_field.is_empty() || self.secret_field.is_empty() {
            return Err(Error::Configuration(
                "field schema requires non-empty identifier and secret field names".into(),
            ));
        }
        if self.identifier_field == self.secret_field {
            return Err(Error::Configuration(format!(
                "identifier and secret fields must differ, both are {}",
                self.identifier_field
            )));
        }
        let mut seen: Vec<&str> = Vec::new();
        for field in self.required_fields() {
            if field.is_empty() {
                return Err(Error::Configuration("field names must not be empty".into()));
            }
            if seen.contains(&field) {
                return Err(Error::Configuration(format!("duplicate field name {field}")));
            }
            seen.push(field);
        }
        Ok(())
    }
}

/// Opaque settings block handed through to a federated collaborator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FederatedConfig {
    /// Provider-specific settings; the core never interprets these
    #[serde(default)]
    pub settings: serde_json::Value,
}

/// One named, process-lifetime authentication strategy
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Delegates entirely to an external identity service
    Federated {
        /// Identifies the external provider to the exchange collaborator
        provider_id: String,
        /// Opaque provider settings
        config: FederatedConfig,
    },
    /// Verifies directly submitted credentials against stored secrets
    Credentials {
        /// Required input fields
        schema: FieldSchema,
    },
}

impl Strategy {
    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Strategy::Federated { .. } => "federated",
            Strategy::Credentials { .. } => "credentials",
        }
    }
}

/// Verdict returned by a federated exchange
#[derive(Debug, Clone)]
pub enum FederatedVerdict {
    /// The external service vouched for this identity
    Authenticated(UserRecord),
    /// The external service rejected the attempt
    Denied,
}

/// Seam to the federated-identity collaborators.
///
/// The core passes through whatever redirect/callback/token payload the
/// external protocol requires (carried opaquely in the credential input) and
/// receives back a normalized verdict. The wire shape is owned by the
/// collaborator, not by this crate.
#[async_trait]
pub trait FederatedExchange: Send + Sync {
    /// Complete the external protocol for `provider_id`
    async fn exchange(
        &self,
        provider_id: &str,
        config: &FederatedConfig,
        input: &CredentialInput,
    ) -> Result<FederatedVerdict>;
}

/// Placeholder exchange for deployments with only a credentials strategy.
/// Any federated attempt routed here is an internal error.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullExchange;

#[async_trait]
impl FederatedExchange for NullExchange {
    async fn exchange(
        &self,
        provider_id: &str,
        _config: &FederatedConfig,
        _input: &CredentialInput,
    ) -> Result<FederatedVerdict> {
        Err(Error::Configuration(format!(
            "no federated exchange configured for provider {provider_id}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_fields_order() {
        let schema = FieldSchema::new("email", "password").with_field("otp");
        let fields: Vec<&str> = schema.required_fields().collect();
        assert_eq!(fields, vec!["email", "password", "otp"]);
    }

    #[test]
    fn test_missing_field_detection() {
        let schema = FieldSchema::new("email", "password");

        let input = CredentialInput::new().with("email", "a@b.com");
        assert_eq!(schema.missing_field(&input), Some("password"));

        let complete = CredentialInput::new()
            .with("email", "a@b.com")
            .with("password", "x")
            .with("extra", "ignored");
        assert_eq!(schema.missing_field(&complete), None);
    }

    #[test]
    fn test_schema_validation() {
        assert!(FieldSchema::new("email", "password").validate().is_ok());
        assert!(FieldSchema::new("email", "email").validate().is_err());
        assert!(FieldSchema::new("", "password").validate().is_err());
        assert!(FieldSchema::new("email", "password")
            .with_field("email")
            .validate()
            .is_err());
    }

    #[test]
    fn test_strategy_kind_labels() {
        let federated = Strategy::Federated {
            provider_id: "github".into(),
            config: FederatedConfig::default(),
        };
        assert_eq!(federated.kind(), "federated");

        let credentials = Strategy::Credentials {
            schema: FieldSchema::new("email", "password"),
        };
        assert_eq!(credentials.kind(), "credentials");
    }

    #[tokio::test]
    async fn test_null_exchange_errors() {
        let err = NullExchange
            .exchange("github", &FederatedConfig::default(), &CredentialInput::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
