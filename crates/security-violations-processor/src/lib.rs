// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Logs pipeline stage that compresses every log record body in place.
//!
//! Security violation events carry large, repetitive bodies. This stage
//! replaces each body with its gzip or xerial-framed snappy encoding before the
//! batch moves on to the next consumer, leaving attributes, timestamps and the
//! batch structure untouched.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use security_violations_processor::{Factory, NopConsumer, Settings};
//! use serde_json::json;
//!
//! let processor = Factory::new()
//!     .create_logs_processor(
//!         Settings::default(),
//!         json!({ "compression": "gzip" }),
//!         Arc::new(NopConsumer),
//!     )
//!     .expect("valid config");
//! # let _ = processor;
//! ```

#![deny(clippy::all)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod component;
pub mod compression;
pub mod config;
pub mod error;
pub mod factory;
pub mod logger;
pub mod model;
pub mod processor;
pub mod xerial;

pub use component::{Capabilities, Component, Host, LogsConsumer, LogsProcessor, NopConsumer};
pub use compression::{BodyEncoder, BodyOutcome, EncodeError};
pub use config::{BodyCompression, Config, ConfigError, SECURITY_VIOLATIONS_PROCESSOR_NAME};
pub use error::{PipelineError, ProcessorError};
pub use factory::{Factory, Settings, StabilityLevel};
pub use model::{AnyValue, KeyValue, LogRecord, Logs, ResourceLogs, ScopeLogs};
pub use processor::{ProcessStats, SecurityViolationsProcessor};
