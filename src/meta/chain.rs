/*
 * Copyright Finvi, Ontario Systems. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use std::borrow::Cow;

use crate::provider::{AuthMode, ConfigError, PrivateKey, ProvideConfig};

/// Configuration provider that checks a series of inner providers
///
/// Precedence is per field, not per provider. For each accessor the chain is
/// walked in order and the first provider that returns a value wins; providers
/// later in the chain are not invoked for that field. Different sources may
/// therefore each supply part of the configuration.
///
/// [`ProviderChain::auth_mode`] is the one asymmetric accessor: a provider may
/// successfully answer with [`AuthMode::Unknown`], and that must not shadow a
/// definite mode declared by a later provider, so the scan continues through
/// the entire chain until it finds a result that is both error-free and not
/// the unknown sentinel.
///
/// A chain implements [`ProvideConfig`] itself, so chains can nest inside
/// other chains.
///
/// # Example
/// ```rust
/// use oci_cli_env_provider::meta::ProviderChain;
/// use oci_cli_env_provider::EnvironmentConfigProvider;
/// let provider = ProviderChain::first_try("Environment", EnvironmentConfigProvider::new())
///     .or_else("Default", oci_cli_env_provider::default_provider());
/// ```
#[derive(Default)]
pub struct ProviderChain {
    providers: Vec<(Cow<'static, str>, Box<dyn ProvideConfig>)>,
}

impl ProviderChain {
    /// Start a chain with its highest precedence provider
    pub fn first_try(
        name: impl Into<Cow<'static, str>>,
        provider: impl ProvideConfig + 'static,
    ) -> Self {
        ProviderChain {
            providers: vec![(name.into(), Box::new(provider))],
        }
    }

    /// Append a lower precedence provider
    pub fn or_else(
        mut self,
        name: impl Into<Cow<'static, str>>,
        provider: impl ProvideConfig + 'static,
    ) -> Self {
        self.providers.push((name.into(), Box::new(provider)));
        self
    }

    /// First success wins; a chain with no successes fails with the
    /// per-provider errors attached.
    fn resolve<T>(
        &self,
        field: &'static str,
        accessor: impl Fn(&dyn ProvideConfig) -> Result<T, ConfigError>,
    ) -> Result<T, ConfigError> {
        let mut sources = Vec::new();
        for (name, provider) in &self.providers {
            let span = tracing::debug_span!("resolve_config_field", field, provider = %name);
            let _enter = span.enter();
            match accessor(provider.as_ref()) {
                Ok(value) => {
                    tracing::debug!(provider = %name, field, "resolved field");
                    return Ok(value);
                }
                Err(err) => {
                    tracing::debug!(provider = %name, field, error = %err, "provider did not resolve field");
                    sources.push(err);
                }
            }
        }
        Err(ConfigError::ChainExhausted { field, sources })
    }
}

impl ProvideConfig for ProviderChain {
    fn private_key(&self) -> Result<PrivateKey, ConfigError> {
        self.resolve("private_key", |p| p.private_key())
    }

    fn key_fingerprint(&self) -> Result<String, ConfigError> {
        self.resolve("key_fingerprint", |p| p.key_fingerprint())
    }

    fn tenancy_id(&self) -> Result<String, ConfigError> {
        self.resolve("tenancy_id", |p| p.tenancy_id())
    }

    fn user_id(&self) -> Result<String, ConfigError> {
        self.resolve("user_id", |p| p.user_id())
    }

    fn region(&self) -> Result<String, ConfigError> {
        self.resolve("region", |p| p.region())
    }

    /// The first mode that is error-free and not [`AuthMode::Unknown`]
    ///
    /// Unlike every other accessor this scans the whole chain: an early
    /// provider answering "unknown" is not a usable result, but it is not a
    /// reason to stop either.
    fn auth_mode(&self) -> Result<AuthMode, ConfigError> {
        for (name, provider) in &self.providers {
            match provider.auth_mode() {
                Ok(mode) if !mode.is_unknown() => {
                    tracing::debug!(provider = %name, auth_mode = %mode, "resolved auth mode");
                    return Ok(mode);
                }
                Ok(_) => {
                    tracing::debug!(provider = %name, "provider declared no definite auth mode");
                }
                Err(err) => {
                    tracing::debug!(provider = %name, error = %err, "provider did not resolve auth mode");
                }
            }
        }
        Err(ConfigError::NoDefiniteAuthMode)
    }

    fn key_id(&self) -> Result<String, ConfigError> {
        self.resolve("key_id", |p| p.key_id())
    }
}
