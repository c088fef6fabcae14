// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Diagnostic logging for the processor.
//!
//! The processor never installs a global subscriber. It is handed a
//! [`tracing::Dispatch`] at construction and emits every event through it, so
//! a host can route this stage's diagnostics wherever it likes (or nowhere,
//! with [`Dispatch::none`]).
//!
//! # Format
//!
//! [`build_dispatch`] creates a standalone dispatcher writing to stderr. Every
//! line it produces has the shape:
//!
//! ```text
//! SECURITY_VIOLATIONS | LEVEL | [span{fields}: ...]message fields
//! ```
//!
//! # Examples
//!
//! ```text
//! SECURITY_VIOLATIONS | DEBUG | create security violations processor (compression=gzip, code=1)
//! SECURITY_VIOLATIONS | DEBUG | consume_logs{service=waf}: processing logs (6 records)
//! SECURITY_VIOLATIONS | DEBUG | consume_logs{service=waf}: failed to set log body: unsupported body type 'map', expected str or bytes
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use security_violations_processor::{logger, Factory, Settings};
//!
//! let settings = Settings::new(logger::build_dispatch("security_violations_processor=debug")?);
//! let processor = Factory::new().create_logs_processor(settings, raw_config, next)?;
//! ```
//!
//! A host that already runs its own subscriber passes that instead, or uses
//! [`Settings::default`](crate::Settings::default), which captures the
//! caller's current default dispatcher.
//!
//! # Filtering
//!
//! Directives follow `EnvFilter` syntax. The processor only logs at `DEBUG`,
//! so anything coarser than `debug` for this crate's target silences it.

use std::fmt;

use tracing::Dispatch;
use tracing_core::{Event, Subscriber};
use tracing_subscriber::fmt::{
    format::{self, FormatEvent, FormatFields},
    FmtContext, FormattedFields,
};
use tracing_subscriber::registry::{LookupSpan, SpanRef};
use tracing_subscriber::EnvFilter;

/// Prefix written at the start of every line.
pub const LOG_PREFIX: &str = "SECURITY_VIOLATIONS";

/// Failure to build a diagnostic dispatcher.
///
/// Returned instead of panicking so the host can refuse to start the pipeline
/// with a readable error.
#[derive(Debug, thiserror::Error)]
pub enum LoggerInitError {
    /// The filter string is not a valid `EnvFilter` directive list.
    #[error("Invalid log filter directive '{directive}': {reason}")]
    InvalidDirective { directive: String, reason: String },
}

/// Builds a dispatcher filtering with an `EnvFilter` directive such as
/// `"debug"` or `"security_violations_processor=debug,warn"`.
///
/// The dispatcher formats with [`Formatter`] and writes to stderr. It is not
/// installed anywhere; hand it to [`Settings::new`](crate::Settings::new).
///
/// # Errors
///
/// [`LoggerInitError::InvalidDirective`] when `directive` does not parse.
pub fn build_dispatch(directive: &str) -> Result<Dispatch, LoggerInitError> {
    let filter =
        EnvFilter::try_new(directive).map_err(|e| LoggerInitError::InvalidDirective {
            directive: directive.to_string(),
            reason: e.to_string(),
        })?;

    let subscriber = tracing_subscriber::fmt()
        .event_format(Formatter)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    Ok(Dispatch::new(subscriber))
}

/// The caller's current default dispatcher.
///
/// Inside [`tracing::dispatcher::with_default`] this is the scoped one,
/// otherwise the global default, otherwise a no-op dispatcher.
#[must_use]
pub fn current_dispatch() -> Dispatch {
    tracing::dispatcher::get_default(Dispatch::clone)
}

/// Event formatter prefixing every line with [`LOG_PREFIX`].
///
/// Security violation bodies go to the same sink as the host's own
/// diagnostics; the fixed prefix lets operators grep this stage out.
///
/// # Line Structure
///
/// 1. **Prefix**: always [`LOG_PREFIX`]
/// 2. **Level**: `ERROR`, `WARN`, `INFO`, `DEBUG` or `TRACE`
/// 3. **Span context**: every active span from the root, `name{fields}: `,
///    braces omitted when the span has no fields
/// 4. **Message and event fields**, as rendered by the subscriber's field
///    formatter
///
/// # Example Output
///
/// ```text
/// SECURITY_VIOLATIONS | DEBUG | consume_logs{service=waf}: processing logs (3 records)
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Formatter;

impl Formatter {
    /// Writes `name{fields}: ` for one span.
    ///
    /// Fields are recorded into the span's extensions by the `fmt` layer when
    /// the span is created; a span created under another subscriber has none.
    fn write_span<S, N>(writer: &mut format::Writer<'_>, span: &SpanRef<'_, S>) -> fmt::Result
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
        N: for<'a> FormatFields<'a> + 'static,
    {
        write!(writer, "{}", span.name())?;

        let extensions = span.extensions();
        match extensions.get::<FormattedFields<N>>() {
            Some(fields) if !fields.is_empty() => write!(writer, "{{{fields}}}: "),
            _ => write!(writer, ": "),
        }
    }
}

impl<S, N> FormatEvent<S, N> for Formatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    /// Formats one event as a single newline-terminated line.
    ///
    /// # Errors
    ///
    /// Only when writing to `writer` fails.
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(writer, "{LOG_PREFIX} | {} | ", event.metadata().level())?;

        for span in ctx.event_scope().into_iter().flat_map(|scope| scope.from_root()) {
            Self::write_span::<S, N>(&mut writer, &span)?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
