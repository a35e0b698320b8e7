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

//! A leveled logger that writes one line per record to a stream or to a file that rotates every
//! day.
//!
//! # Overview
//!
//! A [`Logger`] drops records below its minimum [`Severity`], renders the rest as
//!
//! ```text
//! 2024-08-11 22:44:57 [main.rs:52] [WARN] Hello warn!
//! ```
//!
//! and writes them to a single destination: stdout, stderr, any `io::Write`, or a
//! [`RotatingFile`](append::RotatingFile). With daily rotation enabled, the first write of a new
//! day renames the active file to `<name><ext>.<YYYYMMDD>` and starts a fresh one; rotated files
//! older than the retention window are then removed.
//!
//! # Examples
//!
//! Log to stdout:
//!
//! ```
//! use dailylog::Logger;
//! use dailylog::Severity;
//!
//! let logger = Logger::builder()
//!     .stdout()
//!     .min_level(Severity::Debug)
//!     .show_call_site(true)
//!     .build()
//!     .unwrap();
//!
//! logger.info("This is an info message.");
//! dailylog::warn!(logger: &logger, "{} retries left", 2);
//! ```
//!
//! Install a rotating file logger as the process-wide default, and forward the `log` crate to it:
//!
//! ```no_run
//! use dailylog::Logger;
//!
//! let logger = Logger::builder()
//!     .file("logs/app.log")
//!     .daily_rotate(true)
//!     .build()
//!     .unwrap();
//! dailylog::set_default_logger(logger).unwrap();
//! dailylog::bridge::setup_log_crate();
//!
//! dailylog::error!("Error message.");
//! log::info!("Info message.");
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod append;
pub mod bridge;
pub mod color;
pub mod filter;
pub mod layout;
pub mod record;

mod clock;
pub use self::clock::Clock;
pub use self::clock::ManualClock;

mod error;
pub use self::error::Error;
pub use self::error::ErrorKind;

mod logger;
pub use self::logger::Config;
pub use self::logger::Logger;
pub use self::logger::LoggerBuilder;
pub use self::logger::default_logger;
pub use self::logger::set_default_logger;

#[doc(hidden)]
pub use self::logger::__private_log;

mod macros;

mod trap;
pub use self::trap::DefaultTrap;
pub use self::trap::Trap;

pub use self::append::Append;
pub use self::append::Destination;
pub use self::record::CallSite;
pub use self::record::Record;
pub use self::record::Severity;
