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

/// Emit a formatted record at the given severity.
///
/// The call site is captured with `file!()` and `line!()`. Format arguments are evaluated only
/// if the severity is enabled. Write errors go to the logger's trap.
///
/// Without a leading `logger: <expr>,` the [default logger](crate::default_logger) is used.
///
/// # Examples
///
/// ```
/// use dailylog::Logger;
/// use dailylog::Severity;
///
/// let logger = Logger::builder().writer(std::io::sink()).build().unwrap();
/// dailylog::log!(logger: &logger, Severity::Warn, "disk at {}%", 91);
/// dailylog::log!(Severity::Info, "to the default logger");
/// ```
#[macro_export]
macro_rules! log {
    (logger: $logger:expr, $severity:expr, $($arg:tt)+) => {{
        let logger: &$crate::Logger = $logger;
        let severity: $crate::Severity = $severity;
        if logger.enabled(severity) {
            $crate::__private_log(
                logger,
                severity,
                ::core::file!(),
                ::core::line!(),
                ::core::format_args!($($arg)+),
            );
        }
    }};
    ($severity:expr, $($arg:tt)+) => {
        $crate::log!(logger: $crate::default_logger(), $severity, $($arg)+)
    };
}

/// Emit a formatted record at `DEBUG`. See [`log!`].
#[macro_export]
macro_rules! debug {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::Severity::Debug, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Debug, $($arg)+)
    };
}

/// Emit a formatted record at `INFO`. See [`log!`].
///
/// ```
/// let logger = dailylog::Logger::builder().writer(std::io::sink()).build().unwrap();
/// dailylog::info!(logger: &logger, "listening on {}", "0.0.0.0:8080");
/// ```
#[macro_export]
macro_rules! info {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::Severity::Info, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Info, $($arg)+)
    };
}

/// Emit a formatted record at `WARN`. See [`log!`].
#[macro_export]
macro_rules! warn {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::Severity::Warn, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Warn, $($arg)+)
    };
}

/// Emit a formatted record at `ERROR`. See [`log!`].
#[macro_export]
macro_rules! error {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::Severity::Error, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Error, $($arg)+)
    };
}

/// Emit a formatted record at `FATAL`. See [`log!`].
///
/// Like every other level, this does not terminate the process.
#[macro_export]
macro_rules! fatal {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::Severity::Fatal, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Fatal, $($arg)+)
    };
}
