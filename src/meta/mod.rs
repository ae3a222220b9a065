/*
 * Copyright Finvi, Ontario Systems. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Providers built from other providers

/// Chain providers with per-field fallback
pub mod chain;
pub use chain::ProviderChain;

/// Defer provider construction until first use
pub mod lazy;
pub use lazy::LazyProvider;
