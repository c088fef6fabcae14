// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::config::ConfigError;
use crate::logger::LoggerInitError;

/// Errors that stop the processor from being created.
#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to initialize logger: {0}")]
    LoggerInit(#[from] LoggerInitError),
}

/// Errors crossing the pipeline component boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("Downstream consumer failed: {0}")]
    Downstream(String),
}
