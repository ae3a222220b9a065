/*
 * Copyright Finvi, Ontario Systems. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! The recommended provider for most callers
//!
//! Composes the sources an OCI CLI user expects, in CLI precedence order:
//! 1. `OCI_CLI_*` environment variables
//! 2. The config file profile selected by `OCI_CLI_PROFILE`, or by the
//!    `default_profile` setting in the `[OCI_CLI_SETTINGS]` section
//! 3. The `DEFAULT` config file profile

use std::fmt::{self, Debug, Formatter};

use crate::environment::{EnvironmentConfigProvider, ENV_CONFIG_FILE, ENV_PASSPHRASE, ENV_PROFILE};
use crate::meta::ProviderChain;
use crate::os_shim::{Env, Fs};
use crate::path::expand_home;
use crate::profile::{self, ProfileSet, DEFAULT_CONFIG_FILE};
use crate::provider::{AuthMode, ConfigError, PrivateKey, ProvideConfig};

const SETTINGS_SECTION: &str = "OCI_CLI_SETTINGS";
const SETTINGS_DEFAULT_PROFILE: &str = "default_profile";

const DEFAULT_PROFILE: &str = "DEFAULT";

/// Construct the default provider chain
///
/// # Example
/// ```rust,no_run
/// use oci_cli_env_provider::ProvideConfig;
///
/// let conf = oci_cli_env_provider::default_provider();
/// match conf.region() {
///     Ok(region) => println!("region: {}", region),
///     Err(err) => eprintln!("no region configured: {}", err),
/// }
/// ```
pub fn default_provider() -> DefaultProvider {
    DefaultProvider::builder().build()
}

/// Environment variables, then the selected config file profile, then the
/// `DEFAULT` profile
///
/// Precedence is per field: the environment may supply the region while the
/// config file supplies the key material. The profile step is only present
/// when a profile other than `DEFAULT` is selected, either by `OCI_CLI_PROFILE`
/// or by `default_profile` under `[OCI_CLI_SETTINGS]` in the config file; the
/// `DEFAULT` profile always anchors the chain.
pub struct DefaultProvider {
    chain: ProviderChain,
}

impl DefaultProvider {
    /// A builder for [`DefaultProvider`]
    pub fn builder() -> Builder {
        Builder::default()
    }
}

impl Debug for DefaultProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultProvider").finish_non_exhaustive()
    }
}

impl ProvideConfig for DefaultProvider {
    fn private_key(&self) -> Result<PrivateKey, ConfigError> {
        self.chain.private_key()
    }

    fn key_fingerprint(&self) -> Result<String, ConfigError> {
        self.chain.key_fingerprint()
    }

    fn tenancy_id(&self) -> Result<String, ConfigError> {
        self.chain.tenancy_id()
    }

    fn user_id(&self) -> Result<String, ConfigError> {
        self.chain.user_id()
    }

    fn region(&self) -> Result<String, ConfigError> {
        self.chain.region()
    }

    fn auth_mode(&self) -> Result<AuthMode, ConfigError> {
        self.chain.auth_mode()
    }

    fn key_id(&self) -> Result<String, ConfigError> {
        self.chain.key_id()
    }
}

/// The profile selected by the CLI settings section, if the config file is
/// readable and declares one
fn settings_default_profile(env: &Env, fs: &Fs) -> Option<String> {
    let path = env
        .get(ENV_CONFIG_FILE)
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
    let contents = fs.read_to_string(expand_home(&path, env)).ok()?;
    let profiles = ProfileSet::parse(&contents).ok()?;
    profiles
        .get_profile(SETTINGS_SECTION)?
        .get(SETTINGS_DEFAULT_PROFILE)
        .map(str::to_string)
}

/// Builder for [`DefaultProvider`]
#[derive(Clone, Debug, Default)]
pub struct Builder {
    env: Env,
    fs: Fs,
}

impl Builder {
    /// Override the process environment, primarily for testing
    pub fn env(mut self, env: Env) -> Self {
        self.env = env;
        self
    }

    /// Override the file system, primarily for testing
    pub fn fs(mut self, fs: Fs) -> Self {
        self.fs = fs;
        self
    }

    /// Build the provider chain
    pub fn build(self) -> DefaultProvider {
        let Builder { env, fs } = self;

        let passphrase = env.get(ENV_PASSPHRASE);
        let profile_provider = |name: &str| {
            let mut builder = profile::Provider::builder()
                .env(env.clone())
                .fs(fs.clone())
                .profile_name(name);
            if let Some(passphrase) = &passphrase {
                builder = builder.passphrase(passphrase);
            }
            builder.build()
        };

        let mut chain = ProviderChain::first_try(
            "Environment",
            EnvironmentConfigProvider::new_with(env.clone(), fs.clone()),
        );

        let selected = env
            .get(ENV_PROFILE)
            .or_else(|| settings_default_profile(&env, &fs))
            .filter(|name| name != DEFAULT_PROFILE);
        if let Some(name) = selected {
            tracing::debug!(profile = %name, "selected config file profile");
            chain = chain.or_else("Profile", profile_provider(&name));
        }
        chain = chain.or_else("DefaultProfile", profile_provider(DEFAULT_PROFILE));

        DefaultProvider { chain }
    }
}
