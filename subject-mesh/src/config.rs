/********************************************************************************
 * Copyright (c) 2025 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Service addressing configuration.

use crate::observability::events;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use tracing::debug;

const COMPONENT: &str = "config";

/// Prefix of every environment variable read by [`Config::with_environ`].
pub const ENV_PREFIX: &str = "SUBJECT_MESH_";

/// Subject prefix used when none is configured.
pub const DEFAULT_PREFIX: &str = "svc";

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(json5::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "unable to read config file: {err}"),
            ConfigError::Parse(err) => write!(f, "unable to parse config file: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Subject prefix every endpoint name is namespaced under; defaults to `svc`.
    #[serde(default)]
    pub prefix: String,

    /// Dotted topologies to register under, e.g. `eu.nl.ams`. Parent levels are
    /// registered implicitly.
    #[serde(default)]
    pub topologies: Vec<String>,

    /// Extra key-value metadata exposed with the service.
    #[serde(default)]
    pub meta: BTreeMap<String, String>,

    /// Instance id; generated at start when absent.
    #[serde(default)]
    pub instance_id: Option<String>,
}

impl Config {
    pub fn from_json5_str(contents: &str) -> Result<Self, ConfigError> {
        json5::from_str(contents).map_err(ConfigError::Parse)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_json5_str(&contents)
    }

    /// Overlays `SUBJECT_MESH_*` variables from the process environment.
    pub fn with_environ(self) -> Self {
        self.with_vars(std::env::vars())
    }

    /// Overlays `SUBJECT_MESH_*` variables from the given pairs.
    ///
    /// - `PREFIX` and `INSTANCE_ID` replace the configured value when non-empty.
    /// - `TOPO` appends whitespace-separated topologies.
    /// - `META_<KEY>` sets meta entry `<key>` (lowercased); empty values are skipped.
    pub fn with_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let meta_prefix = format!("{ENV_PREFIX}META_");

        for (key, value) in vars {
            let (key, value) = (key.as_ref(), value.as_ref());
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }

            match name {
                "PREFIX" => self.prefix = value.to_string(),
                "INSTANCE_ID" => self.instance_id = Some(value.to_string()),
                "TOPO" => self
                    .topologies
                    .extend(value.split_whitespace().map(str::to_string)),
                _ => match key.strip_prefix(meta_prefix.as_str()) {
                    Some(meta_key) if !meta_key.is_empty() => {
                        self.meta
                            .insert(meta_key.to_lowercase(), value.to_string());
                    }
                    _ => continue,
                },
            }

            debug!(
                event = events::CONFIG_ENV_OVERRIDE,
                component = COMPONENT,
                key,
                "applied environment override"
            );
        }

        self
    }

    pub fn prefix_or_default(&self) -> &str {
        if self.prefix.is_empty() {
            DEFAULT_PREFIX
        } else {
            &self.prefix
        }
    }

    pub fn sorted_topologies(&self) -> Vec<String> {
        let mut topologies = self.topologies.clone();
        topologies.sort();
        topologies
    }

    /// Configured instance id, ignoring an empty string.
    pub fn instance_id(&self) -> Option<&str> {
        self.instance_id.as_deref().filter(|id| !id.is_empty())
    }
}
