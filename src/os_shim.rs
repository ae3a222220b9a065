/*
 * Copyright Finvi, Ontario Systems. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Abstractions for process state the providers touch:
//! - Reading environment variables
//! - Reading from the file system
//!
//! Environment variables are global to a process, which makes provider code
//! that reads them directly impossible to test under a multi-threaded test
//! runner. Providers in this crate take an [`Env`] and [`Fs`] instead, so
//! tests supply deterministic snapshots rather than mutating real process
//! state between cases.

use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::io;
use std::path::Path;
use std::sync::Arc;

/// Environment variable abstraction
///
/// Either delegates to [`std::env::var`] or serves values from an immutable
/// in-memory map. Cheap to clone.
///
/// # Example
/// ```rust
/// use oci_cli_env_provider::os_shim::Env;
/// let env = Env::from_slice(&[("OCI_CLI_REGION", "us-ashburn-1")]);
/// assert_eq!(env.get("OCI_CLI_REGION").as_deref(), Some("us-ashburn-1"));
/// assert_eq!(env.get("OCI_CLI_TENANCY"), None);
/// ```
#[derive(Clone)]
pub struct Env(Arc<env::Inner>);

impl Default for Env {
    fn default() -> Self {
        Self::real()
    }
}

impl Env {
    /// An environment backed by the real process environment
    pub fn real() -> Self {
        Env(Arc::new(env::Inner::Real))
    }

    /// A fake environment built from a slice of tuples
    pub fn from_slice<'a>(vars: &[(&'a str, &'a str)]) -> Self {
        Env(Arc::new(env::Inner::Fake(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )))
    }

    /// The value of variable `k`, if it is set
    pub fn get(&self, k: &str) -> Option<String> {
        match self.0.as_ref() {
            env::Inner::Real => std::env::var(k).ok(),
            env::Inner::Fake(map) => map.get(k).cloned(),
        }
    }
}

impl From<HashMap<String, String>> for Env {
    fn from(map: HashMap<String, String>) -> Self {
        Env(Arc::new(env::Inner::Fake(map)))
    }
}

impl Debug for Env {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0.as_ref() {
            env::Inner::Real => f.write_str("Env(real)"),
            env::Inner::Fake(map) => write!(f, "Env(fake, {} vars)", map.len()),
        }
    }
}

mod env {
    use std::collections::HashMap;

    pub(super) enum Inner {
        Real,
        Fake(HashMap<String, String>),
    }
}

/// File system abstraction
///
/// Either delegates to [`std::fs`] or serves file contents from an immutable
/// in-memory map. Cheap to clone.
///
/// # Example
/// ```rust
/// use oci_cli_env_provider::os_shim::Fs;
/// let fs = Fs::from_slice(&[("/home/user/.oci/config", "[DEFAULT]\nregion = us-ashburn-1")]);
/// assert!(fs.read_to_string("/home/user/.oci/config").is_ok());
/// assert!(fs.read_to_string("/missing").is_err());
/// ```
#[derive(Clone)]
pub struct Fs(Arc<fs::Inner>);

impl Default for Fs {
    fn default() -> Self {
        Self::real()
    }
}

impl Fs {
    /// A file system backed by [`std::fs`]
    pub fn real() -> Self {
        Fs(Arc::new(fs::Inner::Real))
    }

    /// A fake file system built from a map of path to contents
    pub fn from_map(files: HashMap<String, Vec<u8>>) -> Self {
        Fs(Arc::new(fs::Inner::Fake {
            files: files.into_iter().collect(),
        }))
    }

    /// A fake file system built from a slice of `(path, contents)` tuples
    pub fn from_slice<'a>(files: &[(&'a str, &'a str)]) -> Self {
        Fs(Arc::new(fs::Inner::Fake {
            files: files
                .iter()
                .map(|(path, contents)| (path.to_string(), contents.as_bytes().to_vec()))
                .collect(),
        }))
    }

    /// Read the entire contents of `path`
    pub fn read_to_end(&self, path: impl AsRef<Path>) -> io::Result<Vec<u8>> {
        let path = path.as_ref();
        match self.0.as_ref() {
            fs::Inner::Real => std::fs::read(path),
            fs::Inner::Fake { files } => files
                .get(path.to_string_lossy().as_ref())
                .cloned()
                .ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("no such file: {}", path.display()),
                    )
                }),
        }
    }

    /// Read the entire contents of `path` as UTF-8
    pub fn read_to_string(&self, path: impl AsRef<Path>) -> io::Result<String> {
        let data = self.read_to_end(&path)?;
        String::from_utf8(data).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} did not contain valid UTF-8", path.as_ref().display()),
            )
        })
    }
}

impl Debug for Fs {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0.as_ref() {
            fs::Inner::Real => f.write_str("Fs(real)"),
            fs::Inner::Fake { files } => write!(f, "Fs(fake, {} files)", files.len()),
        }
    }
}

mod fs {
    use std::collections::HashMap;

    pub(super) enum Inner {
        Real,
        Fake { files: HashMap<String, Vec<u8>> },
    }
}
