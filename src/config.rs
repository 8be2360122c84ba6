//! Startup configuration
//!
//! An ordered list of strategy declarations, consumed once at process start
//! to build the frozen [`ProviderRegistry`]. Declaration order is preserved
//! by the registry for enumeration.

use serde::Deserialize;

use crate::registry::ProviderRegistry;
use crate::strategy::{FederatedConfig, FieldSchema, Strategy};
use crate::Result;

/// One strategy declaration
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyDecl {
    /// A federated provider, delegated to an external identity service
    Federated {
        /// Unique strategy name
        name: String,
        /// Provider id handed to the exchange collaborator
        provider_id: String,
        /// Opaque provider settings
        #[serde(default)]
        settings: serde_json::Value,
    },
    /// Direct credential submission
    Credentials {
        /// Unique strategy name
        name: String,
        /// Field holding the lookup identifier, e.g. `email`
        identifier_field: String,
        /// Field holding the raw secret, e.g. `password`
        secret_field: String,
        /// Further required fields, opaque to the core
        #[serde(default)]
        additional_fields: Vec<String>,
    },
}

impl StrategyDecl {
    /// The declared strategy name
    pub fn name(&self) -> &str {
        match self {
            StrategyDecl::Federated { name, .. } => name,
            StrategyDecl::Credentials { name, .. } => name,
        }
    }

    fn into_strategy(self) -> (String, Strategy) {
        match self {
            StrategyDecl::Federated {
                name,
                provider_id,
                settings,
            } => (
                name,
                Strategy::Federated {
                    provider_id,
                    config: FederatedConfig { settings },
                },
            ),
            StrategyDecl::Credentials {
                name,
                identifier_field,
                secret_field,
                additional_fields,
            } => {
                let mut schema = FieldSchema::new(identifier_field, secret_field);
                for field in additional_fields {
                    schema = schema.with_field(field);
                }
                (name, Strategy::Credentials { schema })
            }
        }
    }
}

/// Authentication configuration consumed at startup
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Ordered strategy declarations
    pub strategies: Vec<StrategyDecl>,
}

impl AuthConfig {
    /// Parse a configuration document from JSON
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Build the frozen registry. Duplicate names and malformed schemas fail
    /// here, before any authentication attempt can occur.
    pub fn build_registry(self) -> Result<ProviderRegistry> {
        let mut builder = ProviderRegistry::builder();
        for decl in self.strategies {
            let (name, strategy) = decl.into_strategy();
            builder = builder.register(name, strategy);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    const CONFIG: &str = r#"{
        "strategies": [
            { "kind": "federated", "name": "github", "provider_id": "github" },
            { "kind": "federated", "name": "google", "provider_id": "google",
              "settings": { "prompt": "select_account" } },
            { "kind": "credentials", "name": "credentials",
              "identifier_field": "email", "secret_field": "password" }
        ]
    }"#;

    #[test]
    fn test_parse_and_build() {
        let config = AuthConfig::from_json(CONFIG).unwrap();
        assert_eq!(config.strategies.len(), 3);
        assert_eq!(config.strategies[0].name(), "github");

        let registry = config.build_registry().unwrap();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["github", "google", "credentials"]);

        match registry.resolve("credentials") {
            Some(Strategy::Credentials { schema }) => {
                assert_eq!(schema.identifier_field(), "email");
                assert_eq!(schema.secret_field(), "password");
            }
            _ => panic!("expected credentials strategy"),
        }
    }

    #[test]
    fn test_duplicate_declaration_fails() {
        let raw = r#"{
            "strategies": [
                { "kind": "federated", "name": "github", "provider_id": "github" },
                { "kind": "federated", "name": "github", "provider_id": "github" }
            ]
        }"#;
        let result = AuthConfig::from_json(raw).unwrap().build_registry();
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_malformed_json_fails() {
        assert!(AuthConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn test_additional_fields_carried() {
        let raw = r#"{
            "strategies": [
                { "kind": "credentials", "name": "credentials",
                  "identifier_field": "email", "secret_field": "password",
                  "additional_fields": ["otp"] }
            ]
        }"#;
        let registry = AuthConfig::from_json(raw).unwrap().build_registry().unwrap();
        match registry.resolve("credentials") {
            Some(Strategy::Credentials { schema }) => {
                let fields: Vec<&str> = schema.required_fields().collect();
                assert_eq!(fields, vec!["email", "password", "otp"]);
            }
            _ => panic!("expected credentials strategy"),
        }
    }
}
