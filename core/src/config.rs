//! Client configuration.
//!
//! # Design
//! `ClientConfig` is plain caller-owned data; nothing is stored in statics, so
//! two clients never see each other's settings. The named fields cover the
//! common knobs. Anything else goes through `set_option`, which resolves the
//! option name and checks the value shape up front so a typo is reported
//! here, not silently dropped when the request is built.

use std::collections::BTreeMap;
use std::path::PathBuf;

use log::warn;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ConfigError;
use crate::option::{OptionValue, TransportOption};

/// Environment variable consulted by `ClientConfig::from_env`.
pub const USER_AGENT_ENV: &str = "HTTP_USER_AGENT";

/// User agent used when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("courier/", env!("CARGO_PKG_VERSION"));

/// Settings applied to every request a `Client` sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Read cookies from and write cookies to this file.
    pub cookie_file: Option<PathBuf>,
    pub follow_redirects: bool,
    /// Extra request headers, sent as `Name: value`.
    pub headers: BTreeMap<String, String>,
    pub referer: Option<String>,
    pub user_agent: String,
    options: Vec<(TransportOption, OptionValue)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            cookie_file: None,
            follow_redirects: true,
            headers: BTreeMap::new(),
            referer: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            options: Vec::new(),
        }
    }
}

/// On-disk layout accepted by `ClientConfig::from_json`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigDocument {
    cookie_file: Option<PathBuf>,
    follow_redirects: Option<bool>,
    headers: BTreeMap<String, String>,
    referer: Option<String>,
    user_agent: Option<String>,
    options: Map<String, Value>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, with the user agent taken from `HTTP_USER_AGENT` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(agent) = std::env::var(USER_AGENT_ENV) {
            if !agent.trim().is_empty() {
                config.user_agent = agent;
            }
        }
        config
    }

    /// Load a configuration from a JSON document.
    ///
    /// Missing fields keep their defaults. Every entry of `options` goes
    /// through `set_option` in document order; the first rejected entry fails
    /// the whole load.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        let doc: ConfigDocument = serde_json::from_str(document)?;

        let mut config = Self::default();
        config.cookie_file = doc.cookie_file;
        if let Some(follow) = doc.follow_redirects {
            config.follow_redirects = follow;
        }
        config.headers = doc.headers;
        config.referer = doc.referer;
        if let Some(agent) = doc.user_agent {
            config.user_agent = agent;
        }

        for (name, raw) in &doc.options {
            let option = TransportOption::from_name(name).ok_or_else(|| {
                warn!("rejecting unknown transport option {name:?}");
                ConfigError::UnknownOption(name.clone())
            })?;
            let value = OptionValue::from_json(raw).ok_or_else(|| {
                warn!("rejecting value {raw} for {option}");
                ConfigError::InvalidOptionValue {
                    option,
                    expected: option.kind(),
                }
            })?;
            config.set(option, value)?;
        }
        Ok(config)
    }

    pub fn with_cookie_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookie_file = Some(path.into());
        self
    }

    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set a custom transport option by name.
    ///
    /// The name is case-insensitive and may carry a `CURLOPT_` prefix.
    /// Custom options are applied after the defaults when a request is built,
    /// so they override them.
    pub fn set_option(
        &mut self,
        name: &str,
        value: impl Into<OptionValue>,
    ) -> Result<TransportOption, ConfigError> {
        let Some(option) = TransportOption::from_name(name) else {
            warn!("rejecting unknown transport option {name:?}");
            return Err(ConfigError::UnknownOption(name.to_string()));
        };
        self.set(option, value)?;
        Ok(option)
    }

    /// Set a custom transport option.
    ///
    /// Setting the same option again replaces the value but keeps its
    /// original position among the custom options.
    pub fn set(
        &mut self,
        option: TransportOption,
        value: impl Into<OptionValue>,
    ) -> Result<(), ConfigError> {
        let value = value.into();
        let given = value.kind();
        let Some(value) = value.coerce(option.kind()) else {
            warn!("rejecting {given} value for {option}, expected {}", option.kind());
            return Err(ConfigError::InvalidOptionValue {
                option,
                expected: option.kind(),
            });
        };

        match self.options.iter_mut().find(|(opt, _)| *opt == option) {
            Some(entry) => entry.1 = value,
            None => self.options.push((option, value)),
        }
        Ok(())
    }

    /// Remove a custom option, returning its value.
    pub fn unset(&mut self, option: TransportOption) -> Option<OptionValue> {
        let pos = self.options.iter().position(|(opt, _)| *opt == option)?;
        Some(self.options.remove(pos).1)
    }

    /// Custom options in the order they will be applied.
    pub fn options(&self) -> &[(TransportOption, OptionValue)] {
        &self.options
    }
}
