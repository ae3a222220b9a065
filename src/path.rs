/*
 * Copyright Finvi, Ontario Systems. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Home directory expansion for `~/` shorthand in configured paths

use std::path::{Component, Path, PathBuf};

use crate::os_shim::Env;

/// Expand a leading `~` component to the home directory
///
/// Only a bare leading `~` is expanded; `~user/...` forms are returned
/// unchanged. Paths that do not start with `~` are passed through, separators
/// intact, since they originate from configuration on the target platform.
pub(crate) fn expand_home(path: impl AsRef<Path>, env: &Env) -> PathBuf {
    expand_home_for_os(path, env, Os::real())
}

fn expand_home_for_os(path: impl AsRef<Path>, env: &Env, os: Os) -> PathBuf {
    let path = path.as_ref();
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => {
            let mut expanded = match home_dir(env, os) {
                Some(dir) => dir,
                None => {
                    tracing::warn!(
                        "could not determine home directory but home expansion was requested"
                    );
                    Default::default()
                }
            };
            for component in components {
                expanded.push(component);
            }
            expanded
        }
        _ => path.into(),
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Os {
    Windows,
    NotWindows,
}

impl Os {
    fn real() -> Self {
        match std::env::consts::OS {
            "windows" => Os::Windows,
            _ => Os::NotWindows,
        }
    }
}

/// Resolve the home directory from a set of environment variables
fn home_dir(env: &Env, os: Os) -> Option<PathBuf> {
    if let Some(home) = env.get("HOME") {
        return Some(PathBuf::from(home));
    }

    if os == Os::Windows {
        if let Some(home) = env.get("USERPROFILE") {
            return Some(PathBuf::from(home));
        }

        if let (Some(mut drive), Some(path)) = (env.get("HOMEDRIVE"), env.get("HOMEPATH")) {
            drive.push_str(&path);
            return Some(drive.into());
        }
    }
    None
}

#[cfg(test)]
mod test {
    use super::{expand_home_for_os, Os};
    use crate::os_shim::Env;

    #[test]
    fn expands_home_prefix() {
        let env = Env::from_slice(&[("HOME", "/home/user")]);
        assert_eq!(
            expand_home_for_os("~/.oci/config", &env, Os::NotWindows)
                .to_str()
                .unwrap(),
            "/home/user/.oci/config"
        );
    }

    #[test]
    fn only_expands_bare_tilde() {
        let env = Env::from_slice(&[("HOME", "/home/user")]);
        assert_eq!(
            expand_home_for_os("~oci/config", &env, Os::NotWindows)
                .to_str()
                .unwrap(),
            "~oci/config"
        );
    }

    #[test]
    fn passes_through_absolute_paths() {
        let env = Env::from_slice(&[("HOME", "/home/user")]);
        assert_eq!(
            expand_home_for_os("/etc/oci/config", &env, Os::NotWindows)
                .to_str()
                .unwrap(),
            "/etc/oci/config"
        );
    }

    #[test]
    fn windows_home_fallbacks() {
        let env = Env::from_slice(&[("HOMEDRIVE", "C:"), ("HOMEPATH", "\\Users\\name")]);
        let expanded = expand_home_for_os("~/.oci/config", &env, Os::Windows);
        assert!(expanded.to_str().unwrap().starts_with("C:"));
    }
}
