// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Contract between a pipeline stage and the host runtime that drives it.
//!
//! The host calls, in order:
//!
//! 1. [`Component::start`] once, before the first batch.
//! 2. [`LogsConsumer::consume_logs`] once per batch, possibly from several
//!    threads at the same time.
//! 3. [`Component::shutdown`] once, after the last batch.
//!
//! None of these may block. The `CancellationToken` plays the role of the
//! host's request context: consumers may stop early once it is cancelled.

use tokio_util::sync::CancellationToken;

use crate::error::PipelineError;
use crate::model::Logs;

/// What a consumer does to the batches it is handed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// The consumer modifies batches in place, so the host must not hand the
    /// same batch to another consumer expecting the original contents.
    pub mutates_data: bool,
}

/// Runtime services the host exposes to components.
pub trait Host: Send + Sync {
    /// Name the host reports in diagnostics.
    fn name(&self) -> &str;
}

pub trait Component: Send + Sync {
    fn start(&self, cancel: &CancellationToken, host: &dyn Host) -> Result<(), PipelineError>;

    fn shutdown(&self, cancel: &CancellationToken) -> Result<(), PipelineError>;
}

pub trait LogsConsumer: Send + Sync {
    fn capabilities(&self) -> Capabilities;

    /// Consumes one batch. The host keeps ownership of `logs` and resumes
    /// control as soon as this returns.
    fn consume_logs(&self, cancel: &CancellationToken, logs: &mut Logs) -> Result<(), PipelineError>;
}

/// A logs stage with a lifecycle.
pub trait LogsProcessor: Component + LogsConsumer {}

impl<T: Component + LogsConsumer> LogsProcessor for T {}

/// Terminal consumer that accepts and discards every batch.
#[derive(Clone, Copy, Debug, Default)]
pub struct NopConsumer;

impl LogsConsumer for NopConsumer {
    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    fn consume_logs(&self, _cancel: &CancellationToken, _logs: &mut Logs) -> Result<(), PipelineError> {
        Ok(())
    }
}
