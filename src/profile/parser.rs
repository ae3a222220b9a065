/*
 * Copyright Finvi, Ontario Systems. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Parser for the OCI CLI config file format
//!
//! The format is ini-style: `[section]` headers followed by `key = value`
//! properties, with `#` or `;` full-line comments. Section and property names
//! are matched case-sensitively, as the CLI does.

use std::collections::HashMap;
use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// The parsed contents of a config file
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProfileSet {
    profiles: HashMap<String, Profile>,
}

impl ProfileSet {
    /// Parse `contents` into a set of profiles
    pub fn parse(contents: &str) -> Result<ProfileSet, ProfileParseError> {
        let mut profiles: HashMap<String, Profile> = HashMap::new();
        let mut current: Option<String> = None;

        for (idx, raw) in contents.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let name = header
                    .strip_suffix(']')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| ProfileParseError {
                        line: idx + 1,
                        message: "invalid section header".to_string(),
                    })?;
                profiles
                    .entry(name.to_string())
                    .or_insert_with(|| Profile::new(name));
                current = Some(name.to_string());
            } else if let Some((key, value)) = line.split_once('=') {
                let profile = current
                    .as_ref()
                    .and_then(|name| profiles.get_mut(name))
                    .ok_or_else(|| ProfileParseError {
                        line: idx + 1,
                        message: "property defined before any section".to_string(),
                    })?;
                profile
                    .properties
                    .insert(key.trim().to_string(), value.trim().to_string());
            } else {
                return Err(ProfileParseError {
                    line: idx + 1,
                    message: format!("expected `[section]` or `key = value`, got `{}`", line),
                });
            }
        }

        Ok(ProfileSet { profiles })
    }

    /// The profile named `name`, if it is defined
    pub fn get_profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }
}

/// An individual profile section
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Profile {
    name: String,
    properties: HashMap<String, String>,
}

impl Profile {
    fn new(name: impl Into<String>) -> Self {
        Profile {
            name: name.into(),
            properties: HashMap::new(),
        }
    }

    /// The name of this profile
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value of the property named `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// The config file could not be parsed
#[derive(Debug)]
pub struct ProfileParseError {
    line: usize,
    message: String,
}

impl Display for ProfileParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "error parsing config file on line {}: {}", self.line, self.message)
    }
}

impl Error for ProfileParseError {}
