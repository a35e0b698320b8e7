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

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crate::Error;
use crate::Severity;
use crate::Trap;
use crate::append::Append;
use crate::append::RotatingFileBuilder;
use crate::append::Stderr;
use crate::append::Stdout;
use crate::append::Writer;
use crate::clock::Clock;
use crate::logger::Config;
use crate::logger::Logger;
use crate::trap::DefaultTrap;

#[derive(Debug)]
enum Target {
    Append(Box<dyn Append>),
    File(PathBuf),
}

/// A builder for configuring a [`Logger`].
///
/// The destination defaults to stdout.
///
/// # Examples
///
/// Log to a file that rotates every day and keeps a week of history:
///
/// ```no_run
/// use dailylog::Logger;
/// use dailylog::Severity;
///
/// let logger = Logger::builder()
///     .file("logs/app.log")
///     .min_level(Severity::Info)
///     .daily_rotate(true)
///     .max_days(7)
///     .build()
///     .unwrap();
///
/// logger.info("service started");
/// ```
#[must_use = "call `build` to construct the logger"]
#[derive(Debug)]
pub struct LoggerBuilder {
    target: Target,
    config: Config,
    clock: Clock,
    trap: Box<dyn Trap>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerBuilder {
    /// Create a new [`LoggerBuilder`] writing to stdout with the default [`Config`].
    pub fn new() -> Self {
        Self {
            target: Target::Append(Box::new(Stdout::default())),
            config: Config::default(),
            clock: Clock::default(),
            trap: Box::new(DefaultTrap::default()),
        }
    }

    /// Write to stdout.
    pub fn stdout(self) -> Self {
        self.append(Stdout::default())
    }

    /// Write to stderr.
    pub fn stderr(self) -> Self {
        self.append(Stderr::default())
    }

    /// Write to an arbitrary stream.
    pub fn writer<W: io::Write + Send + 'static>(self, writer: W) -> Self {
        self.append(Writer::new(writer))
    }

    /// Write to the file at `path`, rotating it daily if [`daily_rotate`](Self::daily_rotate) is
    /// set.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.target = Target::File(path.into());
        self
    }

    /// Write to a custom sink.
    ///
    /// File rotation options do not apply to custom sinks.
    pub fn append(mut self, append: impl Into<Box<dyn Append>>) -> Self {
        self.target = Target::Append(append.into());
        self
    }

    /// Replace all options at once.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the minimum severity. See [`Config::min_level`].
    pub fn min_level(mut self, min_level: Severity) -> Self {
        self.config.min_level = Some(min_level);
        self
    }

    /// See [`Config::show_call_site`].
    pub fn show_call_site(mut self, yes: bool) -> Self {
        self.config.show_call_site = yes;
        self
    }

    /// See [`Config::highlight`].
    pub fn highlight(mut self, yes: bool) -> Self {
        self.config.highlight = yes;
        self
    }

    /// See [`Config::daily_rotate`].
    pub fn daily_rotate(mut self, yes: bool) -> Self {
        self.config.daily_rotate = yes;
        self
    }

    /// See [`Config::max_days`].
    pub fn max_days(mut self, max_days: u64) -> Self {
        self.config.max_days = max_days;
        self
    }

    /// Set the clock that stamps records. The time of each record decides its day.
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Set the trap for errors that cannot be returned to a caller.
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Build the [`Logger`].
    ///
    /// # Errors
    ///
    /// Return a [`Construction`](crate::ErrorKind::Construction) error if the log file cannot be
    /// opened.
    pub fn build(self) -> Result<Logger, Error> {
        let Self {
            target,
            config,
            clock,
            trap,
        } = self;

        // shared by the logger and the file sink
        let trap: Arc<dyn Trap> = Arc::from(trap);
        let append = match target {
            Target::Append(append) => append,
            Target::File(path) => RotatingFileBuilder::new(path)
                .daily_rotate(config.daily_rotate)
                .max_days(config.retention_days())
                .clock(clock.clone())
                .shared_trap(trap.clone())
                .build()?
                .into(),
        };

        Ok(Logger::new(append, &config, clock, trap))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::ErrorKind;
    use crate::append::Destination;

    #[test]
    fn test_default_builds_stdout_info_logger() {
        let logger = LoggerBuilder::new().build().unwrap();
        assert!(!logger.enabled(Severity::Debug));
        assert!(logger.enabled(Severity::Info));
    }

    #[test]
    fn test_file_logger_defaults_to_debug() {
        let temp_dir = TempDir::new().unwrap();
        let logger = Logger::builder()
            .file(temp_dir.path().join("app.log"))
            .build()
            .unwrap();
        assert!(logger.enabled(Severity::Debug));
    }

    #[test]
    fn test_custom_sink_keeps_its_destination() {
        #[derive(Debug)]
        struct FileLike;

        impl Append for FileLike {
            fn append(&self, _: &jiff::Zoned, _: &[u8]) -> Result<(), Error> {
                Ok(())
            }

            fn destination(&self) -> Destination {
                Destination::File
            }
        }

        let logger = Logger::builder().append(FileLike).build().unwrap();
        assert!(logger.enabled(Severity::Debug));
    }

    #[test]
    fn test_unopenable_file_fails_construction() {
        let temp_dir = TempDir::new().unwrap();
        let err = Logger::builder()
            .file(temp_dir.path())
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Construction);
    }
}
