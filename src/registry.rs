//! Provider registry
//!
//! Strategies are registered once at startup through the builder and the
//! registry is frozen afterwards, so concurrent `resolve` calls need no
//! locking. Registering two strategies under the same name is a fatal
//! configuration error at build time, never a runtime failure.

use std::collections::BTreeMap;

use crate::strategy::Strategy;
use crate::{Error, Result};

/// Startup-frozen, ordered collection of named strategies
pub struct ProviderRegistry {
    strategies: BTreeMap<String, Strategy>,
    order: Vec<String>,
}

impl ProviderRegistry {
    /// Start building a registry
    pub fn builder() -> ProviderRegistryBuilder {
        ProviderRegistryBuilder::new()
    }

    /// Resolve a strategy by name
    pub fn resolve(&self, name: &str) -> Option<&Strategy> {
        self.strategies.get(name)
    }

    /// Strategy names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of registered strategies
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no strategies are registered
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Builder collecting strategy registrations before the freeze
#[derive(Default)]
pub struct ProviderRegistryBuilder {
    entries: Vec<(String, Strategy)>,
}

impl ProviderRegistryBuilder {
    fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Register a strategy under a unique name
    pub fn register(mut self, name: impl Into<String>, strategy: Strategy) -> Self {
        self.entries.push((name.into(), strategy));
        self
    }

    /// Validate and freeze the registry.
    ///
    /// Fails on empty or duplicate names and on malformed credential field
    /// schemas, before any authentication attempt can occur.
    pub fn build(self) -> Result<ProviderRegistry> {
        let mut strategies = BTreeMap::new();
        let mut order = Vec::with_capacity(self.entries.len());

        for (name, strategy) in self.entries {
            if name.is_empty() {
                return Err(Error::Configuration("strategy name must not be empty".into()));
            }
            if let Strategy::Credentials { schema } = &strategy {
                schema.validate()?;
            }
            if strategies.insert(name.clone(), strategy).is_some() {
                return Err(Error::Configuration(format!("duplicate strategy name {name}")));
            }
            order.push(name);
        }

        Ok(ProviderRegistry { strategies, order })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{FederatedConfig, FieldSchema};

    fn federated(provider: &str) -> Strategy {
        Strategy::Federated {
            provider_id: provider.into(),
            config: FederatedConfig::default(),
        }
    }

    #[test]
    fn test_resolve_and_order() {
        let registry = ProviderRegistry::builder()
            .register("github", federated("github"))
            .register("google", federated("google"))
            .register(
                "credentials",
                Strategy::Credentials {
                    schema: FieldSchema::new("email", "password"),
                },
            )
            .build()
            .unwrap();

        assert_eq!(registry.len(), 3);
        assert!(registry.resolve("github").is_some());
        assert!(registry.resolve("twitter").is_none());

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["github", "google", "credentials"]);
    }

    #[test]
    fn test_duplicate_name_fails_build() {
        let result = ProviderRegistry::builder()
            .register("github", federated("github"))
            .register("github", federated("github-enterprise"))
            .build();

        match result {
            Err(Error::Configuration(msg)) => assert!(msg.contains("github")),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected configuration error"),
        }
    }

    #[test]
    fn test_empty_name_fails_build() {
        let result = ProviderRegistry::builder().register("", federated("github")).build();
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_malformed_schema_fails_build() {
        let result = ProviderRegistry::builder()
            .register(
                "credentials",
                Strategy::Credentials {
                    schema: FieldSchema::new("email", "email"),
                },
            )
            .build();
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_empty_registry_is_valid() {
        let registry = ProviderRegistry::builder().build().unwrap();
        assert!(registry.is_empty());
    }
}
