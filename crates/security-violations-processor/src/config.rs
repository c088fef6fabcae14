// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Processor configuration.
//!
//! The processor reads two settings:
//!
//! ```yaml
//! processors:
//!   securityviolationsprocessor:
//!     service_name: nginx-app-protect   # diagnostic label only
//!     compression: gzip                 # none | gzip | snappy (default: snappy)
//! ```
//!
//! Settings reach the processor either as an untyped map handed over by the host
//! pipeline ([`Config::from_value`]) or from a YAML document layered with
//! `SECURITY_VIOLATIONS_*` environment overrides ([`Config::from_yaml_str`],
//! [`Config::load`]). Absent keys fall back to [`Config::default`]; a key that
//! is present with the wrong shape is a [`ConfigError`] and the processor is
//! never built.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Component type name, also the default `service_name`.
pub const SECURITY_VIOLATIONS_PROCESSOR_NAME: &str = "securityviolationsprocessor";

/// Prefix for environment variable overrides, e.g. `SECURITY_VIOLATIONS_COMPRESSION=gzip`.
pub const ENV_PREFIX: &str = "SECURITY_VIOLATIONS_";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to decode processor config: {0}")]
    Decode(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Decode(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Decode(err.to_string())
    }
}

/// Algorithm applied to every log record body.
///
/// The numeric codes are part of the configuration surface: older deployments
/// configure `compression: 1` rather than `compression: gzip`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BodyCompression {
    /// Leave bodies untouched.
    None,
    /// RFC 1952 gzip stream at the fastest deflate level.
    Gzip,
    /// Snappy blocks in xerial framing.
    #[default]
    Snappy,
}

impl BodyCompression {
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            BodyCompression::None => 0,
            BodyCompression::Gzip => 1,
            BodyCompression::Snappy => 2,
        }
    }

    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(BodyCompression::None),
            1 => Some(BodyCompression::Gzip),
            2 => Some(BodyCompression::Snappy),
            _ => None,
        }
    }
}

impl AsRef<str> for BodyCompression {
    fn as_ref(&self) -> &str {
        match self {
            BodyCompression::None => "none",
            BodyCompression::Gzip => "gzip",
            BodyCompression::Snappy => "snappy",
        }
    }
}

impl fmt::Display for BodyCompression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl FromStr for BodyCompression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(BodyCompression::None),
            "gzip" => Ok(BodyCompression::Gzip),
            "snappy" => Ok(BodyCompression::Snappy),
            _ => Err(format!(
                "Invalid compression: '{s}'. Valid values are: none, gzip, snappy",
            )),
        }
    }
}

/// Accepts a case-insensitive name or the numeric code.
///
/// Unlike most agent settings this is strict: an unrecognised value must stop
/// the processor from being created rather than silently pick an algorithm the
/// downstream consumer cannot decode.
impl<'de> Deserialize<'de> for BodyCompression {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;

        match value {
            Value::String(s) => BodyCompression::from_str(&s).map_err(serde::de::Error::custom),
            Value::Number(n) => n
                .as_i64()
                .and_then(BodyCompression::from_code)
                .ok_or_else(|| {
                    serde::de::Error::custom(format!(
                        "Invalid compression code: {n}. Valid codes are: 0 (none), 1 (gzip), 2 (snappy)"
                    ))
                }),
            other => Err(serde::de::Error::custom(format!(
                "Expected a string or integer for compression, got {other}"
            ))),
        }
    }
}

impl Serialize for BodyCompression {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_ref())
    }
}

/// Resolved processing policy. Immutable once the processor is built.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Diagnostic label, no behavioral effect.
    pub service_name: String,
    pub compression: BodyCompression,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: SECURITY_VIOLATIONS_PROCESSOR_NAME.to_string(),
            compression: BodyCompression::default(),
        }
    }
}

impl Config {
    /// Decodes the untyped settings map supplied by the host pipeline.
    ///
    /// `null` stands for "no settings configured" and yields the defaults.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Decodes a YAML document, then applies `SECURITY_VIOLATIONS_*` overrides.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Self::extract(Self::figment().merge(Yaml::string(yaml)))
    }

    /// Reads a YAML file, then applies `SECURITY_VIOLATIONS_*` overrides.
    ///
    /// A missing file is not an error: defaults and environment still apply.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::extract(Self::figment().merge(Yaml::file(path)))
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        Ok(config)
    }
}
