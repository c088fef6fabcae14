// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Log body compression stage.
//!
//! For every record of every scope of every resource in a batch, the body is
//! replaced by its compressed bytes:
//!
//! ```text
//!    Logs (from the previous stage)
//!         │
//!         v
//!   ┌──────────────────────────────┐
//!   │ SecurityViolationsProcessor  │  body: Str("...") -> Bytes(gzip | xerial snappy)
//!   └──────────────┬───────────────┘
//!                  │ same batch, mutated in place
//!                  v
//!          next LogsConsumer
//! ```
//!
//! # Failure isolation
//!
//! A body that cannot be compressed (a map or array body, a writer failure) is
//! logged at debug level and left as it was. The remaining records are still
//! processed and the batch is still handed to the next consumer; a single bad
//! record never costs the whole batch.
//!
//! # Concurrency
//!
//! The processor is immutable after construction and can serve batches from
//! several threads at once. Each call builds its own [`BodyEncoder`], so no
//! scratch buffer is shared between batches.

use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, debug_span, Dispatch};

use crate::compression::{BodyEncoder, BodyOutcome};
use crate::component::{Capabilities, Component, Host, LogsConsumer};
use crate::config::{BodyCompression, Config};
use crate::error::PipelineError;
use crate::model::Logs;

/// Counters for one [`SecurityViolationsProcessor::process_logs`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProcessStats {
    /// Records visited before returning.
    pub records: usize,
    pub compressed: usize,
    /// Records left as is: compression disabled, or an empty body.
    pub skipped: usize,
    /// Records whose body could not be compressed and was left as is.
    pub failed: usize,
    /// Processing stopped early because the batch was cancelled.
    pub cancelled: bool,
}

pub struct SecurityViolationsProcessor {
    config: Config,
    logger: Dispatch,
    next: Arc<dyn LogsConsumer>,
}

impl fmt::Debug for SecurityViolationsProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityViolationsProcessor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SecurityViolationsProcessor {
    /// Creates a processor that forwards every batch to `next` once its bodies
    /// are compressed. All diagnostics go through `logger`.
    #[must_use]
    pub fn new(config: Config, logger: Dispatch, next: Arc<dyn LogsConsumer>) -> Self {
        Self {
            config,
            logger,
            next,
        }
    }

    #[must_use]
    pub fn with_compression(mut self, compression: BodyCompression) -> Self {
        self.config.compression = compression;
        self
    }

    #[must_use]
    pub fn with_logger(mut self, logger: Dispatch) -> Self {
        self.logger = logger;
        self
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn compression(&self) -> BodyCompression {
        self.config.compression
    }

    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.config.service_name
    }

    /// Compresses every record body in `logs` in place.
    ///
    /// Never fails: per-record errors are logged and counted in
    /// [`ProcessStats::failed`]. When `cancel` fires, records not yet visited
    /// are left untouched and [`ProcessStats::cancelled`] is set.
    pub fn process_logs(&self, cancel: &CancellationToken, logs: &mut Logs) -> ProcessStats {
        self.process_logs_with(cancel, logs, |_| {})
    }

    /// [`Self::process_logs`], calling `after_record` with the running counters
    /// once each visited record is done.
    fn process_logs_with<F>(
        &self,
        cancel: &CancellationToken,
        logs: &mut Logs,
        after_record: F,
    ) -> ProcessStats
    where
        F: FnMut(&ProcessStats),
    {
        tracing::dispatcher::with_default(&self.logger, || {
            let span = debug_span!("consume_logs", service = %self.config.service_name);
            let _guard = span.enter();
            self.process_logs_inner(cancel, logs, after_record)
        })
    }

    fn process_logs_inner<F>(
        &self,
        cancel: &CancellationToken,
        logs: &mut Logs,
        mut after_record: F,
    ) -> ProcessStats
    where
        F: FnMut(&ProcessStats),
    {
        debug!("processing logs ({} records)", logs.log_record_count());

        let mut stats = ProcessStats::default();
        let mut encoder = BodyEncoder::new(self.config.compression);

        'batch: for resource_logs in &mut logs.resource_logs {
            for scope_logs in &mut resource_logs.scope_logs {
                for record in &mut scope_logs.log_records {
                    if cancel.is_cancelled() {
                        stats.cancelled = true;
                        break 'batch;
                    }
                    stats.records += 1;

                    match encoder.encode_body(&mut record.body) {
                        Ok(BodyOutcome::Compressed) => stats.compressed += 1,
                        Ok(BodyOutcome::Skipped) => stats.skipped += 1,
                        Err(e) => {
                            stats.failed += 1;
                            debug!("failed to set log body: {e}");
                        }
                    }
                    after_record(&stats);
                }
            }
        }

        if stats.cancelled {
            debug!(
                "processing cancelled after {} records, remaining records left untouched",
                stats.records
            );
        }

        stats
    }
}

impl Component for SecurityViolationsProcessor {
    fn start(&self, _cancel: &CancellationToken, host: &dyn Host) -> Result<(), PipelineError> {
        tracing::dispatcher::with_default(&self.logger, || {
            debug!(
                "starting security violations processor (service={}, host={})",
                self.config.service_name,
                host.name()
            );
        });
        Ok(())
    }

    fn shutdown(&self, _cancel: &CancellationToken) -> Result<(), PipelineError> {
        tracing::dispatcher::with_default(&self.logger, || {
            debug!("shutting down security violations processor");
        });
        Ok(())
    }
}

impl LogsConsumer for SecurityViolationsProcessor {
    fn capabilities(&self) -> Capabilities {
        Capabilities { mutates_data: true }
    }

    fn consume_logs(&self, cancel: &CancellationToken, logs: &mut Logs) -> Result<(), PipelineError> {
        self.process_logs(cancel, logs);
        self.next.consume_logs(cancel, logs)
    }
}
