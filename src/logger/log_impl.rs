// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use std::sync::OnceLock;

use crate::Error;
use crate::Severity;
use crate::Trap;
use crate::append::Append;
use crate::append::Stdout;
use crate::clock::Clock;
use crate::filter::LevelFilter;
use crate::layout::TextLayout;
use crate::logger::Config;
use crate::logger::LoggerBuilder;
use crate::record::CallSite;
use crate::record::Record;
use crate::trap::DefaultTrap;

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Set the process-wide default logger used by the macros without an explicit `logger:` and by
/// the `log` crate bridge.
///
/// This should be called early in the execution of a Rust program. Records emitted through the
/// default logger before this call go to the lazily created stdout logger instead.
///
/// # Errors
///
/// Return the given logger back if a default logger has already been set or created.
pub fn set_default_logger(logger: Logger) -> Result<(), Logger> {
    DEFAULT_LOGGER.set(logger)
}

/// The process-wide default logger.
///
/// If none was set, a logger writing `INFO` and above to stdout is created on first use.
///
/// The instance lives for the rest of the process; call `default_logger().flush()` before exit
/// when the destination buffers.
pub fn default_logger() -> &'static Logger {
    DEFAULT_LOGGER.get_or_init(|| {
        Logger::new(
            Box::new(Stdout::default()),
            &Config::default(),
            Clock::default(),
            Arc::new(DefaultTrap::default()),
        )
    })
}

/// A leveled logger writing one line per record to a single destination.
///
/// Records below the minimum severity are dropped before anything is formatted. Eligible records
/// are rendered by a [`TextLayout`] and handed to the destination sink.
///
/// `Logger` is `Send + Sync`; share it by reference or wrap it in an `Arc`.
#[derive(Debug)]
pub struct Logger {
    filter: LevelFilter,
    layout: TextLayout,
    append: Box<dyn Append>,
    clock: Clock,
    trap: Arc<dyn Trap>,
}

impl Logger {
    pub(super) fn new(
        append: Box<dyn Append>,
        config: &Config,
        clock: Clock,
        trap: Arc<dyn Trap>,
    ) -> Self {
        let destination = append.destination();
        let filter = LevelFilter::new(config.min_level_for(destination));
        let layout = TextLayout::default()
            .show_call_site(config.show_call_site)
            .highlight(config.highlight);

        Self {
            filter,
            layout,
            append,
            clock,
            trap,
        }
    }

    /// Create a new [`LoggerBuilder`].
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// The minimum severity this logger emits.
    pub fn min_level(&self) -> Severity {
        self.filter.min_level()
    }

    /// Whether a record at `severity` would be emitted.
    pub fn enabled(&self, severity: Severity) -> bool {
        self.filter.eligible(severity)
    }

    /// Emit `message` at `severity`, with the caller's location as the call site.
    ///
    /// # Errors
    ///
    /// Return the sink's error if the line could not be written.
    #[track_caller]
    pub fn emit(&self, severity: Severity, message: impl fmt::Display) -> Result<(), Error> {
        let call_site = CallSite::from(Location::caller());
        self.emit_args(severity, Some(call_site), format_args!("{message}"))
    }

    /// Emit a preformatted payload at `severity` with an explicit call site.
    ///
    /// This is the entry point of the logging macros and the `log` crate bridge.
    ///
    /// # Errors
    ///
    /// Return the sink's error if the line could not be written.
    pub fn emit_args(
        &self,
        severity: Severity,
        call_site: Option<CallSite<'_>>,
        payload: fmt::Arguments<'_>,
    ) -> Result<(), Error> {
        if !self.enabled(severity) {
            return Ok(());
        }

        let record = Record::new(self.clock.now(), severity, payload).with_call_site(call_site);
        let mut line = self.layout.format(&record, self.append.destination());
        line.push('\n');
        self.append.append(record.time(), line.as_bytes())
    }

    /// Emit `message` at `DEBUG`. Errors go to the trap.
    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) {
        self.report(self.emit(Severity::Debug, message));
    }

    /// Emit `message` at `INFO`. Errors go to the trap.
    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) {
        self.report(self.emit(Severity::Info, message));
    }

    /// Emit `message` at `WARN`. Errors go to the trap.
    #[track_caller]
    pub fn warn(&self, message: impl fmt::Display) {
        self.report(self.emit(Severity::Warn, message));
    }

    /// Emit `message` at `ERROR`. Errors go to the trap.
    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) {
        self.report(self.emit(Severity::Error, message));
    }

    /// Emit `message` at `FATAL`. Errors go to the trap.
    ///
    /// This does not terminate the process; exiting is up to the caller.
    #[track_caller]
    pub fn fatal(&self, message: impl fmt::Display) {
        self.report(self.emit(Severity::Fatal, message));
    }

    /// Flush the destination.
    ///
    /// # Errors
    ///
    /// Return the sink's error if the flush failed.
    pub fn flush(&self) -> Result<(), Error> {
        self.append.flush()
    }

    pub(crate) fn report(&self, result: Result<(), Error>) {
        if let Err(err) = result {
            self.trap.trap(&err);
        }
    }
}

#[doc(hidden)]
pub fn __private_log(
    logger: &Logger,
    severity: Severity,
    file: &'static str,
    line: u32,
    payload: fmt::Arguments<'_>,
) {
    let call_site = CallSite::new(file, line);
    logger.report(logger.emit_args(severity, Some(call_site), payload));
}
