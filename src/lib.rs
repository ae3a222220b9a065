/*
 * Copyright Finvi, Ontario Systems. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Configuration providers for OCI API authentication, driven by the
//! [environment variables](https://docs.oracle.com/en-us/iaas/Content/API/SDKDocs/clienvironmentvariables.htm)
//! and config files the OCI CLI understands.
//!
//! The entry point for most callers is [`default_provider`], which resolves
//! each configuration field from the environment first and the config file
//! second:
//!
//! ```rust,no_run
//! use oci_cli_env_provider::ProvideConfig;
//!
//! let conf = oci_cli_env_provider::default_provider();
//! let region = conf.region()?;
//! let key_id = conf.key_id()?;
//! # Ok::<(), oci_cli_env_provider::ConfigError>(())
//! ```
//!
//! Custom compositions are built from the pieces directly. Chains resolve each
//! field independently, and [`meta::LazyProvider`] defers construction of an
//! expensive provider until a field is actually requested from it:
//!
//! ```rust,no_run
//! use oci_cli_env_provider::meta::{LazyProvider, ProviderChain};
//! use oci_cli_env_provider::{EnvironmentConfigProvider, ProvideConfig};
//!
//! let provider = ProviderChain::first_try("Environment", EnvironmentConfigProvider::new())
//!     .or_else(
//!         "Fallback",
//!         LazyProvider::new(|| {
//!             // probe the environment, construct the expensive provider
//!             Ok(Box::new(oci_cli_env_provider::default_provider()) as Box<dyn ProvideConfig>)
//!         }),
//!     );
//! ```

#![warn(missing_docs)]

pub mod default_provider;
pub mod environment;
pub mod meta;
pub mod os_shim;
mod path;
pub mod profile;
mod provider;

pub use default_provider::{default_provider, DefaultProvider};
pub use environment::EnvironmentConfigProvider;
pub use provider::{AuthMode, ConfigError, PrivateKey, ProvideConfig};
