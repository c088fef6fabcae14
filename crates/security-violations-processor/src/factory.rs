// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Registration point for the host pipeline.
//!
//! The host looks the factory up by [`Factory::component_type`], asks it for
//! a default config, and then hands it the raw settings for each configured
//! instance.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, Dispatch};

use crate::component::LogsConsumer;
use crate::config::{Config, SECURITY_VIOLATIONS_PROCESSOR_NAME};
use crate::error::ProcessorError;
use crate::logger::{self, LoggerInitError};
use crate::processor::SecurityViolationsProcessor;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum StabilityLevel {
    Development,
    Alpha,
    Beta,
    Stable,
}

impl fmt::Display for StabilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StabilityLevel::Development => "development",
            StabilityLevel::Alpha => "alpha",
            StabilityLevel::Beta => "beta",
            StabilityLevel::Stable => "stable",
        };
        f.write_str(s)
    }
}

/// Creation-time settings the host passes to the factory.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Where the created processor sends its diagnostics.
    pub logger: Dispatch,
}

impl Default for Settings {
    /// Uses the caller's current default dispatcher.
    fn default() -> Self {
        Self {
            logger: logger::current_dispatch(),
        }
    }
}

impl Settings {
    #[must_use]
    pub fn new(logger: Dispatch) -> Self {
        Self { logger }
    }

    /// Settings with a standalone stderr logger, see [`logger::build_dispatch`].
    pub fn with_log_level(directive: &str) -> Result<Self, LoggerInitError> {
        Ok(Self {
            logger: logger::build_dispatch(directive)?,
        })
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Factory;

impl Factory {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn component_type(&self) -> &'static str {
        SECURITY_VIOLATIONS_PROCESSOR_NAME
    }

    #[must_use]
    pub fn logs_stability(&self) -> StabilityLevel {
        StabilityLevel::Beta
    }

    #[must_use]
    pub fn create_default_config(&self) -> Config {
        Config::default()
    }

    /// Decodes `raw` and builds a processor forwarding to `next`.
    ///
    /// A settings map that does not decode is fatal; the host must not start
    /// the pipeline.
    pub fn create_logs_processor(
        &self,
        settings: Settings,
        raw: Value,
        next: Arc<dyn LogsConsumer>,
    ) -> Result<SecurityViolationsProcessor, ProcessorError> {
        let config = tracing::dispatcher::with_default(&settings.logger, || {
            let config = Config::from_value(raw).inspect_err(|e| {
                debug!("failed to decode {} config: {e}", self.component_type());
            })?;
            debug!(
                "create security violations processor (compression={}, code={})",
                config.compression,
                config.compression.code()
            );
            Ok::<_, ProcessorError>(config)
        })?;

        Ok(SecurityViolationsProcessor::new(config, settings.logger, next))
    }
}
