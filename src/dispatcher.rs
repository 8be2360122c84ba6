//! Authentication dispatcher
//!
//! Resolves the requested strategy, executes it and normalizes whatever
//! happens into exactly one [`AuthOutcome`]. The dispatcher never panics and
//! never lets a collaborator error cross its boundary; unexpected failures
//! are downgraded to [`FailureKind::Internal`] with no detail carried.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::gateway::{IdentityGateway, Lookup};
use crate::outcome::{AuthOutcome, FailureKind};
use crate::registry::ProviderRegistry;
use crate::strategy::{FederatedExchange, FederatedVerdict, FieldSchema, Strategy};
use crate::verifier::{CredentialVerifier, SecretProof};
use crate::{CredentialInput, Error, Result};

/// Stateless authentication entry point.
///
/// Holds no mutable state between invocations beyond the frozen registry
/// reference, so any number of `authenticate` calls may run concurrently.
pub struct Dispatcher<G, F> {
    registry: Arc<ProviderRegistry>,
    verifier: CredentialVerifier,
    gateway: G,
    federated: F,
}

impl<G, F> Dispatcher<G, F>
where
    G: IdentityGateway,
    F: FederatedExchange,
{
    /// Create a new dispatcher builder
    pub fn builder() -> DispatcherBuilder<G, F> {
        DispatcherBuilder::new()
    }

    /// The registry this dispatcher resolves strategies against
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Authenticate one attempt against the named strategy.
    ///
    /// Every path returns exactly one outcome; this call does not fail.
    pub async fn authenticate(&self, strategy_name: &str, input: &CredentialInput) -> AuthOutcome {
        let Some(strategy) = self.registry.resolve(strategy_name) else {
            debug!(strategy = strategy_name, "unknown strategy");
            return AuthOutcome::Failure(FailureKind::UnknownStrategy);
        };

        debug!(strategy = strategy_name, kind = strategy.kind(), "dispatching attempt");
        match strategy {
            Strategy::Federated { provider_id, config } => {
                match self.federated.exchange(provider_id, config, input).await {
                    Ok(FederatedVerdict::Authenticated(user)) => {
                        debug!(strategy = strategy_name, user = %user.id, "federated attempt succeeded");
                        AuthOutcome::Success(user)
                    }
                    Ok(FederatedVerdict::Denied) => {
                        debug!(strategy = strategy_name, "federated attempt denied");
                        AuthOutcome::Failure(FailureKind::AuthenticationFailed)
                    }
                    Err(err) => {
                        warn!(strategy = strategy_name, error = %err, "federated exchange failed");
                        AuthOutcome::Failure(FailureKind::Internal)
                    }
                }
            }
            Strategy::Credentials { schema } => {
                self.authenticate_credentials(strategy_name, schema, input).await
            }
        }
    }

    async fn authenticate_credentials(
        &self,
        strategy_name: &str,
        schema: &FieldSchema,
        input: &CredentialInput,
    ) -> AuthOutcome {
        if let Some(field) = schema.missing_field(input) {
            debug!(strategy = strategy_name, field, "required field missing");
            return AuthOutcome::Failure(FailureKind::InvalidInput);
        }

        let (Some(identifier), Some(secret)) = (
            input.get(schema.identifier_field()),
            input.get(schema.secret_field()),
        ) else {
            return AuthOutcome::Failure(FailureKind::InvalidInput);
        };
        if identifier.is_empty() || secret.is_empty() {
            debug!(strategy = strategy_name, "empty identifier or secret");
            return AuthOutcome::Failure(FailureKind::InvalidInput);
        }

        let proof = SecretProof::new(secret, &self.verifier);
        match self.gateway.find(identifier, &proof).await {
            Ok(Lookup::Found(user)) => {
                debug!(strategy = strategy_name, user = %user.id, "attempt succeeded");
                AuthOutcome::Success(user)
            }
            Ok(Lookup::NotFound) => {
                // Unknown identifier and secret mismatch are reported
                // identically; see the non-enumeration property.
                debug!(strategy = strategy_name, "attempt failed");
                AuthOutcome::Failure(FailureKind::AuthenticationFailed)
            }
            Err(err) => {
                warn!(strategy = strategy_name, error = %err, "identity lookup failed");
                AuthOutcome::Failure(FailureKind::Internal)
            }
        }
    }
}

/// Builder for [`Dispatcher`]
pub struct DispatcherBuilder<G, F> {
    registry: Option<Arc<ProviderRegistry>>,
    verifier: Option<CredentialVerifier>,
    gateway: Option<G>,
    federated: Option<F>,
}

impl<G, F> DispatcherBuilder<G, F>
where
    G: IdentityGateway,
    F: FederatedExchange,
{
    fn new() -> Self {
        Self {
            registry: None,
            verifier: None,
            gateway: None,
            federated: None,
        }
    }

    /// Set the frozen provider registry
    pub fn with_registry(mut self, registry: Arc<ProviderRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Override the default credential verifier
    pub fn with_verifier(mut self, verifier: CredentialVerifier) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Set the identity lookup gateway
    pub fn with_gateway(mut self, gateway: G) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Set the federated exchange collaborator
    pub fn with_federated(mut self, federated: F) -> Self {
        self.federated = Some(federated);
        self
    }

    /// Build the dispatcher
    pub fn build(self) -> Result<Dispatcher<G, F>> {
        let registry = self
            .registry
            .ok_or_else(|| Error::Configuration("provider registry is required".into()))?;
        let gateway = self
            .gateway
            .ok_or_else(|| Error::Configuration("identity gateway is required".into()))?;
        let federated = self
            .federated
            .ok_or_else(|| Error::Configuration("federated exchange is required".into()))?;

        Ok(Dispatcher {
            registry,
            verifier: self.verifier.unwrap_or_default(),
            gateway,
            federated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryDirectory;
    use crate::strategy::NullExchange;
    use crate::verifier::VerifierConfig;

    fn test_verifier() -> CredentialVerifier {
        CredentialVerifier::new(VerifierConfig {
            memory_cost: 256,
            time_cost: 1,
            parallelism: 1,
        })
    }

    fn test_dispatcher() -> Dispatcher<MemoryDirectory, NullExchange> {
        let registry = ProviderRegistry::builder()
            .register(
                "credentials",
                Strategy::Credentials {
                    schema: FieldSchema::new("email", "password"),
                },
            )
            .build()
            .unwrap();

        Dispatcher::builder()
            .with_registry(Arc::new(registry))
            .with_verifier(test_verifier())
            .with_gateway(MemoryDirectory::new())
            .with_federated(NullExchange)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_unknown_strategy() {
        let dispatcher = test_dispatcher();
        let outcome = dispatcher
            .authenticate("unregistered-name", &CredentialInput::new())
            .await;
        assert_eq!(outcome.failure(), Some(FailureKind::UnknownStrategy));
    }

    #[tokio::test]
    async fn test_missing_field() {
        let dispatcher = test_dispatcher();
        let input = CredentialInput::new().with("email", "a@b.com");
        let outcome = dispatcher.authenticate("credentials", &input).await;
        assert_eq!(outcome.failure(), Some(FailureKind::InvalidInput));
    }

    #[tokio::test]
    async fn test_empty_secret_is_invalid_input() {
        let dispatcher = test_dispatcher();
        let input = CredentialInput::new().with("email", "a@b.com").with("password", "");
        let outcome = dispatcher.authenticate("credentials", &input).await;
        assert_eq!(outcome.failure(), Some(FailureKind::InvalidInput));
    }

    #[tokio::test]
    async fn test_builder_requires_registry() {
        let result = Dispatcher::<MemoryDirectory, NullExchange>::builder()
            .with_gateway(MemoryDirectory::new())
            .with_federated(NullExchange)
            .build();
        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
