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

//! Color utilities.

use colored::Color;

use crate::Severity;

/// Colors for different severities.
///
/// Applied to a whole rendered line as `ESC[0;<fg>m` ... `ESC[0m`.
#[derive(Debug, Clone)]
pub struct LevelColor {
    /// Color for debug records.
    pub debug: Color,
    /// Color for info records.
    pub info: Color,
    /// Color for warn records.
    pub warn: Color,
    /// Color for error records.
    pub error: Color,
    /// Color for fatal records.
    pub fatal: Color,
}

impl Default for LevelColor {
    fn default() -> Self {
        Self {
            debug: Color::Cyan,
            info: Color::Cyan,
            warn: Color::Yellow,
            error: Color::Red,
            fatal: Color::Red,
        }
    }
}

impl LevelColor {
    /// The color of the given severity.
    pub fn color(&self, severity: Severity) -> Color {
        match severity {
            Severity::Debug => self.debug,
            Severity::Info => self.info,
            Severity::Warn => self.warn,
            Severity::Error => self.error,
            Severity::Fatal => self.fatal,
        }
    }

    /// Wrap `line` in the escape prefix of `severity` and a reset suffix.
    pub fn paint(&self, severity: Severity, line: &str) -> String {
        let fg = self.color(severity).to_fg_str();
        format!("\x1b[0;{fg}m{line}\x1b[0m")
    }
}
