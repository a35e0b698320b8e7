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

use std::fmt::Write;

use crate::Destination;
use crate::color::LevelColor;
use crate::record::Record;

/// The `strftime` format of the timestamp header.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A layout that renders a record as one line of text.
///
/// Output format:
///
/// ```text
/// 2024-08-11 22:44:57 [main.rs:51] [ERROR] Hello error!
/// 2024-08-11 22:44:57 [main.rs:52] [WARN] Hello warn!
/// 2024-08-11 22:44:57 [INFO] Hello info!
/// ```
///
/// The `[file:line] ` part appears only with [`show_call_site`](TextLayout::show_call_site);
/// records without a captured call site render it as `[???:0] `.
///
/// With [`highlight`](TextLayout::highlight), lines rendered for a [`Destination::Stream`] are
/// wrapped in a color escape keyed by severity. Lines rendered for a [`Destination::File`] are
/// never colored.
///
/// The timestamp is taken from the record, in the record's time zone.
#[derive(Debug, Clone, Default)]
pub struct TextLayout {
    show_call_site: bool,
    highlight: bool,
    colors: LevelColor,
}

impl TextLayout {
    /// Prefix each line with the `[file:line] ` of the call site.
    pub fn show_call_site(mut self, yes: bool) -> Self {
        self.show_call_site = yes;
        self
    }

    /// Color lines written to stream destinations.
    pub fn highlight(mut self, yes: bool) -> Self {
        self.highlight = yes;
        self
    }

    /// Customize the colors used by [`highlight`](TextLayout::highlight).
    pub fn colors(mut self, colors: LevelColor) -> Self {
        self.colors = colors;
        self
    }

    /// Render `record` for the given destination, without a trailing newline.
    pub fn format(&self, record: &Record, destination: Destination) -> String {
        let mut text = record.time().strftime(TIMESTAMP_FORMAT).to_string();
        text.push(' ');

        // SAFETY: write to a string always succeeds
        if self.show_call_site {
            let written = match record.call_site() {
                Some(site) => write!(&mut text, "[{}:{}] ", site.filename(), site.line()),
                None => write!(&mut text, "[???:0] "),
            };
            written.unwrap();
        }

        let severity = record.severity();
        write!(&mut text, "[{}] {}", severity.as_str(), record.payload()).unwrap();

        if self.highlight && destination == Destination::Stream {
            self.colors.paint(severity, &text)
        } else {
            text
        }
    }
}
