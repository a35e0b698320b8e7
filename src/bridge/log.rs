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

//! Forward records of the [`log`] crate to a [`Logger`].

use crate::Logger;
use crate::Severity;
use crate::default_logger;
use crate::record::CallSite;

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Severity::Error,
            log::Level::Warn => Severity::Warn,
            log::Level::Info => Severity::Info,
            log::Level::Debug | log::Level::Trace => Severity::Debug,
        }
    }
}

struct LogCrateLogger(());

impl log::Log for LogCrateLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        log::Log::enabled(default_logger(), metadata)
    }

    fn log(&self, record: &log::Record) {
        log::Log::log(default_logger(), record);
    }

    fn flush(&self) {
        log::Log::flush(default_logger());
    }
}

/// Set up the log crate global logger.
///
/// This function calls [`log::set_logger`] to set up a `LogCrateLogger` and all logs from the
/// log crate will be forwarded to the [default logger](crate::default_logger).
///
/// This function will set the global maximum log level to `Trace`. To override this, call
/// [`log::set_max_level`] after this function.
///
/// # Errors
///
/// Return an error if the log crate global logger has already been set.
pub fn try_setup_log_crate() -> Result<(), log::SetLoggerError> {
    static LOGGER: LogCrateLogger = LogCrateLogger(());
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Set up the log crate global logger.
///
/// See [`try_setup_log_crate`].
///
/// # Panics
///
/// Panic if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// dailylog::bridge::setup_log_crate();
/// log::info!("forwarded to the default logger");
/// ```
pub fn setup_log_crate() {
    try_setup_log_crate().expect(
        "dailylog::bridge::setup_log_crate must be called before the log crate global logger initialized",
    )
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        Logger::enabled(self, metadata.level().into())
    }

    fn log(&self, record: &log::Record) {
        let call_site = record
            .file()
            .map(|file| CallSite::new(file, record.line().unwrap_or(0)));
        let result = self.emit_args(record.level().into(), call_site, *record.args());
        self.report(result);
    }

    fn flush(&self) {
        let result = Logger::flush(self);
        self.report(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_mapping() {
        assert_eq!(Severity::from(log::Level::Error), Severity::Error);
        assert_eq!(Severity::from(log::Level::Warn), Severity::Warn);
        assert_eq!(Severity::from(log::Level::Info), Severity::Info);
        assert_eq!(Severity::from(log::Level::Debug), Severity::Debug);
        assert_eq!(Severity::from(log::Level::Trace), Severity::Debug);
    }
}
