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

use crate::Severity;
use crate::append::Destination;
use crate::append::file::DEFAULT_MAX_DAYS;

/// The options a [`Logger`](super::Logger) is built from.
///
/// All fields default to off, with `min_level` unset and `max_days` zero.
///
/// With the `serde` feature enabled, `Config` can be deserialized from any self-describing format;
/// missing fields take their default values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Records below this severity are dropped.
    ///
    /// When unset, stream destinations default to `INFO` and file destinations to `DEBUG`.
    pub min_level: Option<Severity>,
    /// Prefix each line with `[file:line] ` of the call site.
    pub show_call_site: bool,
    /// Color lines written to stream destinations.
    pub highlight: bool,
    /// Rotate file destinations when the calendar day changes.
    pub daily_rotate: bool,
    /// Days rotated files are kept; `0` means [`DEFAULT_MAX_DAYS`].
    pub max_days: u64,
}

impl Config {
    /// The minimum severity for records written to `destination`.
    pub fn min_level_for(&self, destination: Destination) -> Severity {
        match (self.min_level, destination) {
            (Some(min_level), _) => min_level,
            (None, Destination::Stream) => Severity::Info,
            (None, Destination::File) => Severity::Debug,
        }
    }

    /// The retention window in days, with `0` resolved to [`DEFAULT_MAX_DAYS`].
    pub fn retention_days(&self) -> u64 {
        if self.max_days == 0 {
            DEFAULT_MAX_DAYS
        } else {
            self.max_days
        }
    }
}
