/*
 * Copyright Finvi, Ontario Systems. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::provider::{AuthMode, ConfigError, PrivateKey, ProvideConfig};

type Factory = dyn Fn() -> Result<Box<dyn ProvideConfig>, ConfigError> + Send + Sync;

/// Configuration provider that is initialized on first use
///
/// The factory typically performs an expensive or environment-sensitive probe,
/// for example constructing an instance principal provider that only works on
/// a compute instance. It runs at most once, triggered by the first accessor
/// call of any kind:
///
/// - on success the constructed provider serves that call and every later one
/// - on failure the error is cached, and every accessor returns
///   [`ConfigError::Initialization`] wrapping that same error without ever
///   retrying the factory
///
/// If no accessor is ever called — say, because earlier providers in a
/// [`ProviderChain`](crate::meta::ProviderChain) satisfy every field — the
/// factory is never invoked. Concurrent first calls are serialized so the
/// factory still runs exactly once.
///
/// # Example
/// ```rust
/// use oci_cli_env_provider::meta::LazyProvider;
/// use oci_cli_env_provider::{ConfigError, EnvironmentConfigProvider, ProvideConfig};
///
/// let provider = LazyProvider::new(|| {
///     // an environment probe would go here
///     Ok(Box::new(EnvironmentConfigProvider::new()) as Box<dyn ProvideConfig>)
/// });
/// ```
pub struct LazyProvider {
    factory: Box<Factory>,
    cell: OnceCell<Result<Box<dyn ProvideConfig>, Arc<ConfigError>>>,
}

impl LazyProvider {
    /// Wrap a provider factory
    pub fn new(
        factory: impl Fn() -> Result<Box<dyn ProvideConfig>, ConfigError> + Send + Sync + 'static,
    ) -> Self {
        LazyProvider {
            factory: Box::new(factory),
            cell: OnceCell::new(),
        }
    }

    /// The inner provider, constructing it on the first call
    fn provider(&self) -> Result<&dyn ProvideConfig, ConfigError> {
        let state = self.cell.get_or_init(|| {
            let span = tracing::debug_span!("initialize_lazy_provider");
            let _enter = span.enter();
            match (self.factory)() {
                Ok(provider) => {
                    tracing::debug!("lazy provider initialized");
                    Ok(provider)
                }
                Err(err) => {
                    tracing::warn!(error = %err, "lazy provider initialization failed");
                    Err(Arc::new(err))
                }
            }
        });
        match state {
            Ok(provider) => Ok(provider.as_ref()),
            Err(err) => Err(ConfigError::Initialization(Arc::clone(err))),
        }
    }
}

impl Debug for LazyProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let state = match self.cell.get() {
            None => "uninitialized",
            Some(Ok(_)) => "ready",
            Some(Err(_)) => "failed",
        };
        f.debug_struct("LazyProvider").field("state", &state).finish()
    }
}

impl ProvideConfig for LazyProvider {
    fn private_key(&self) -> Result<PrivateKey, ConfigError> {
        self.provider()?.private_key()
    }

    fn key_fingerprint(&self) -> Result<String, ConfigError> {
        self.provider()?.key_fingerprint()
    }

    fn tenancy_id(&self) -> Result<String, ConfigError> {
        self.provider()?.tenancy_id()
    }

    fn user_id(&self) -> Result<String, ConfigError> {
        self.provider()?.user_id()
    }

    fn region(&self) -> Result<String, ConfigError> {
        self.provider()?.region()
    }

    fn auth_mode(&self) -> Result<AuthMode, ConfigError> {
        self.provider()?.auth_mode()
    }

    fn key_id(&self) -> Result<String, ConfigError> {
        self.provider()?.key_id()
    }
}

#[cfg(test)]
mod test {
    use super::LazyProvider;
    use crate::meta::ProviderChain;
    use crate::provider::{AuthMode, ConfigError, ProvideConfig};
    use crate::EnvironmentConfigProvider;
    use crate::os_shim::{Env, Fs};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_factory(
        count: Arc<AtomicUsize>,
        fail: bool,
    ) -> impl Fn() -> Result<Box<dyn ProvideConfig>, ConfigError> + Send + Sync {
        move || {
            count.fetch_add(1, Ordering::SeqCst);
            if fail {
                Err(ConfigError::MissingEnv { name: "OCI_CLI_TENANCY" })
            } else {
                Ok(Box::new(EnvironmentConfigProvider::new_with(
                    Env::from_slice(&[
                        ("OCI_CLI_TENANCY", "tenancy"),
                        ("OCI_CLI_REGION", "us-ashburn-1"),
                    ]),
                    Fs::from_slice(&[]),
                )) as Box<dyn ProvideConfig>)
            }
        }
    }

    #[test]
    fn initializes_once_across_accessors() {
        let count = Arc::new(AtomicUsize::new(0));
        let provider = LazyProvider::new(counting_factory(Arc::clone(&count), false));

        let _ = provider.private_key();
        let _ = provider.key_id();
        let _ = provider.tenancy_id();
        let _ = provider.user_id();
        let _ = provider.key_fingerprint();
        let _ = provider.region();
        let _ = provider.auth_mode();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(provider.tenancy_id().unwrap(), "tenancy");
    }

    #[test]
    fn not_initialized_if_never_accessed() {
        let count = Arc::new(AtomicUsize::new(0));
        let lazy = LazyProvider::new(counting_factory(Arc::clone(&count), false));
        let chain = ProviderChain::first_try(
            "Environment",
            EnvironmentConfigProvider::new_with(
                Env::from_slice(&[("OCI_CLI_REGION", "us-phoenix-1")]),
                Fs::from_slice(&[]),
            ),
        )
        .or_else("Lazy", lazy);

        assert_eq!(chain.region().unwrap(), "us-phoenix-1");
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failure_is_cached_permanently() {
        let count = Arc::new(AtomicUsize::new(0));
        let provider = LazyProvider::new(counting_factory(Arc::clone(&count), true));

        let first = provider.tenancy_id().expect_err("factory fails");
        let second = provider.region().expect_err("failure is cached");
        let third = provider.auth_mode().expect_err("failure is cached");

        assert_eq!(count.load(Ordering::SeqCst), 1);
        for err in [&first, &second, &third] {
            assert!(matches!(err, ConfigError::Initialization(_)), "{}", err);
            assert!(err.to_string().contains("OCI_CLI_TENANCY"), "{}", err);
        }
    }

    #[test]
    fn concurrent_first_use_initializes_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let provider = Arc::new(LazyProvider::new(counting_factory(Arc::clone(&count), false)));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let provider = Arc::clone(&provider);
                std::thread::spawn(move || provider.tenancy_id())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), "tenancy");
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn delegates_after_initialization() {
        let provider = LazyProvider::new(|| {
            Ok(Box::new(EnvironmentConfigProvider::new_with(
                Env::from_slice(&[("OCI_CLI_AUTH", "security_token")]),
                Fs::from_slice(&[]),
            )) as Box<dyn ProvideConfig>)
        });
        assert_eq!(provider.auth_mode().unwrap(), AuthMode::SecurityToken);
        assert!(provider.tenancy_id().is_err());
    }
}
