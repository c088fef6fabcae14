// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Mock pipeline components for integration tests

#![allow(dead_code)]

use std::sync::Mutex;

use security_violations_processor::{
    Capabilities, Host, Logs, LogsConsumer, PipelineError,
};
use tokio_util::sync::CancellationToken;

/// Mock host for lifecycle calls
pub struct MockHost;

impl Host for MockHost {
    fn name(&self) -> &str {
        "mock-host"
    }
}

/// Mock next consumer recording every batch it receives
#[derive(Default)]
pub struct RecordingConsumer {
    batches: Mutex<Vec<Logs>>,
}

impl RecordingConsumer {
    pub fn batches(&self) -> Vec<Logs> {
        self.batches.lock().expect("lock poisoned").clone()
    }
}

impl LogsConsumer for RecordingConsumer {
    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    fn consume_logs(&self, _cancel: &CancellationToken, logs: &mut Logs) -> Result<(), PipelineError> {
        self.batches.lock().expect("lock poisoned").push(logs.clone());
        Ok(())
    }
}

/// Mock next consumer that cancels the batch token when it is reached
pub struct CancellingConsumer;

impl LogsConsumer for CancellingConsumer {
    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    fn consume_logs(&self, cancel: &CancellationToken, _logs: &mut Logs) -> Result<(), PipelineError> {
        cancel.cancel();
        Ok(())
    }
}
