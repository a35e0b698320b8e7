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

/// Checks whether a record at `severity` may be emitted under the minimum level `min_level`.
///
/// # Examples
///
/// ```
/// use dailylog::Severity;
/// use dailylog::filter::eligible;
///
/// assert!(!eligible(Severity::Info, Severity::Warn));
/// assert!(eligible(Severity::Warn, Severity::Warn));
/// assert!(eligible(Severity::Fatal, Severity::Warn));
/// ```
#[inline]
pub fn eligible(severity: Severity, min_level: Severity) -> bool {
    severity >= min_level
}

/// A filter that admits records at or above a minimum severity.
///
/// If the filter is set to `WARN`, it will allow `WARN`, `ERROR`, and `FATAL` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelFilter {
    min_level: Severity,
}

impl LevelFilter {
    /// Create a filter with the given minimum severity.
    pub fn new(min_level: Severity) -> Self {
        Self { min_level }
    }

    /// The minimum severity admitted.
    pub fn min_level(&self) -> Severity {
        self.min_level
    }

    /// Checks the given severity against the minimum.
    #[inline]
    pub fn eligible(&self, severity: Severity) -> bool {
        eligible(severity, self.min_level)
    }
}
