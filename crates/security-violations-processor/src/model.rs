// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! In-memory representation of a batch of log records.
//!
//! A batch is a three level hierarchy mirroring the OTLP logs layout:
//!
//! ```text
//! Logs
//!  └── ResourceLogs   (resource attributes)
//!       └── ScopeLogs (instrumentation scope)
//!            └── LogRecord
//! ```
//!
//! The host pipeline owns every value in here. Processors receive a `&mut Logs`
//! for the duration of one call and may only touch what their contract allows.

/// One delivery unit of log records.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Logs {
    pub resource_logs: Vec<ResourceLogs>,
}

impl Logs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of log records across every resource and scope.
    #[must_use]
    pub fn log_record_count(&self) -> usize {
        self.resource_logs
            .iter()
            .flat_map(|resource_logs| &resource_logs.scope_logs)
            .map(|scope_logs| scope_logs.log_records.len())
            .sum()
    }

    /// Appends an empty resource group and returns it for filling in.
    pub fn append_resource_logs(&mut self) -> &mut ResourceLogs {
        self.resource_logs.push(ResourceLogs::default());
        let last = self.resource_logs.len() - 1;
        &mut self.resource_logs[last]
    }
}

/// Log records produced by a single resource.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourceLogs {
    pub resource: Resource,
    pub scope_logs: Vec<ScopeLogs>,
    pub schema_url: String,
}

impl ResourceLogs {
    /// Appends an empty scope group and returns it for filling in.
    pub fn append_scope_logs(&mut self) -> &mut ScopeLogs {
        self.scope_logs.push(ScopeLogs::default());
        let last = self.scope_logs.len() - 1;
        &mut self.scope_logs[last]
    }
}

/// Entity producing telemetry (a host, a container, a service instance).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resource {
    pub attributes: Vec<KeyValue>,
    pub dropped_attributes_count: u32,
}

/// Log records emitted by a single instrumentation scope.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScopeLogs {
    pub scope: InstrumentationScope,
    pub log_records: Vec<LogRecord>,
    pub schema_url: String,
}

impl ScopeLogs {
    /// Appends a default record and returns it for filling in.
    pub fn append_log_record(&mut self) -> &mut LogRecord {
        self.log_records.push(LogRecord::default());
        let last = self.log_records.len() - 1;
        &mut self.log_records[last]
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InstrumentationScope {
    pub name: String,
    pub version: String,
    pub attributes: Vec<KeyValue>,
}

/// OTLP severity number, carried through untouched. `0` is unspecified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct SeverityNumber(pub i32);

impl SeverityNumber {
    /// Severity NGINX App Protect reports for violations.
    pub const WARN: Self = Self(13);
}

/// A single log record.
///
/// `body` is the only field the compression stage rewrites.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogRecord {
    pub time_unix_nano: u64,
    pub observed_time_unix_nano: u64,
    pub severity_number: SeverityNumber,
    pub severity_text: String,
    pub body: AnyValue,
    pub attributes: Vec<KeyValue>,
    pub dropped_attributes_count: u32,
    pub flags: u32,
    pub trace_id: [u8; 16],
    pub span_id: [u8; 8],
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyValue {
    pub key: String,
    pub value: AnyValue,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<AnyValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Tagged value used for bodies and attributes.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum AnyValue {
    /// No value set.
    #[default]
    Empty,
    Str(String),
    Bool(bool),
    Int(i64),
    Double(f64),
    Bytes(Vec<u8>),
    Array(Vec<AnyValue>),
    Map(Vec<KeyValue>),
}

impl AnyValue {
    /// Short lowercase name of the value's tag, used in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            AnyValue::Empty => "empty",
            AnyValue::Str(_) => "str",
            AnyValue::Bool(_) => "bool",
            AnyValue::Int(_) => "int",
            AnyValue::Double(_) => "double",
            AnyValue::Bytes(_) => "bytes",
            AnyValue::Array(_) => "array",
            AnyValue::Map(_) => "map",
        }
    }

    /// True for an unset value and for zero-length strings or byte sequences.
    #[must_use]
    pub fn is_empty_body(&self) -> bool {
        match self {
            AnyValue::Empty => true,
            AnyValue::Str(s) => s.is_empty(),
            AnyValue::Bytes(b) => b.is_empty(),
            _ => false,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnyValue::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            AnyValue::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl From<&str> for AnyValue {
    fn from(value: &str) -> Self {
        AnyValue::Str(value.to_string())
    }
}

impl From<String> for AnyValue {
    fn from(value: String) -> Self {
        AnyValue::Str(value)
    }
}

impl From<Vec<u8>> for AnyValue {
    fn from(value: Vec<u8>) -> Self {
        AnyValue::Bytes(value)
    }
}

impl From<i64> for AnyValue {
    fn from(value: i64) -> Self {
        AnyValue::Int(value)
    }
}

impl From<bool> for AnyValue {
    fn from(value: bool) -> Self {
        AnyValue::Bool(value)
    }
}
