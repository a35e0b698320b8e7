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

//! Log records and their severity.

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;
use std::path::Path;
use std::str::FromStr;

use jiff::Zoned;

use crate::Error;
use crate::ErrorKind;

/// The ordered severity of a record.
///
/// From least to most severe: `DEBUG`, `INFO`, `WARN`, `ERROR`, `FATAL`. The discriminants are the
/// integer values used in configuration.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    /// Designates diagnostics only useful while debugging.
    Debug = 1,
    /// Designates useful information.
    Info = 2,
    /// Designates hazardous situations.
    Warn = 3,
    /// Designates errors.
    Error = 4,
    /// Designates errors the caller considers unrecoverable.
    ///
    /// Logging at this severity never terminates the process.
    Fatal = 5,
}

impl Severity {
    /// All severities, from least to most severe.
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
    ];

    /// Return the fixed label of the `Severity`.
    ///
    /// This returns the same string as the `fmt::Display` implementation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// Return the integer value of the `Severity`.
    pub fn value(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Debug for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl TryFrom<u8> for Severity {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        Severity::ALL
            .into_iter()
            .find(|s| s.value() == value)
            .ok_or_else(|| {
                Error::new(ErrorKind::Config, format!("malformed severity value: {value}"))
            })
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Severity, Self::Err> {
        for (name, severity) in [
            ("debug", Severity::Debug),
            ("info", Severity::Info),
            ("warn", Severity::Warn),
            ("warning", Severity::Warn),
            ("error", Severity::Error),
            ("fatal", Severity::Fatal),
        ] {
            if s.eq_ignore_ascii_case(name) {
                return Ok(severity);
            }
        }

        match s.parse::<u8>() {
            Ok(value) => Severity::try_from(value),
            Err(_) => Err(Error::new(
                ErrorKind::Config,
                format!("malformed severity: {s:?}"),
            )),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Name(String),
            Value(u8),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Name(name) => name.parse(),
            Repr::Value(value) => Severity::try_from(value),
        }
        .map_err(serde::de::Error::custom)
    }
}

/// The source location a record was emitted from.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct CallSite<'a> {
    file: &'a str,
    line: u32,
}

impl<'a> CallSite<'a> {
    /// Create a call site from a source file path and a line number.
    pub fn new(file: &'a str, line: u32) -> Self {
        Self { file, line }
    }

    /// The source file path, as recorded by the compiler.
    pub fn file(&self) -> &'a str {
        self.file
    }

    /// The file name of the source file, without its directories.
    pub fn filename(&self) -> Cow<'a, str> {
        Path::new(self.file)
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or(Cow::Borrowed(self.file))
    }

    /// The line number.
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl From<&'static Location<'static>> for CallSite<'static> {
    fn from(location: &'static Location<'static>) -> Self {
        CallSite::new(location.file(), location.line())
    }
}

/// A single log record, created per call and consumed by the layout.
#[derive(Clone, Debug)]
pub struct Record<'a> {
    // the observed time
    time: Zoned,
    severity: Severity,
    call_site: Option<CallSite<'a>>,
    payload: fmt::Arguments<'a>,
}

impl<'a> Record<'a> {
    /// Create a record observed at `time`.
    pub fn new(time: Zoned, severity: Severity, payload: fmt::Arguments<'a>) -> Self {
        Self {
            time,
            severity,
            call_site: None,
            payload,
        }
    }

    /// Set the call site.
    pub fn with_call_site(mut self, call_site: Option<CallSite<'a>>) -> Self {
        self.call_site = call_site;
        self
    }

    /// The observed time.
    pub fn time(&self) -> &Zoned {
        &self.time
    }

    /// The severity of the record.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Where the record was emitted from, if it was captured.
    pub fn call_site(&self) -> Option<CallSite<'a>> {
        self.call_site
    }

    /// The message body.
    pub fn payload(&self) -> &fmt::Arguments<'a> {
        &self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order_and_values() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);

        let values = Severity::ALL.map(|s| s.value());
        assert_eq!(values, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!("WARN".parse::<Severity>().unwrap(), Severity::Warn);
        assert_eq!("warning".parse::<Severity>().unwrap(), Severity::Warn);
        assert_eq!("Fatal".parse::<Severity>().unwrap(), Severity::Fatal);
        assert_eq!("4".parse::<Severity>().unwrap(), Severity::Error);

        let err = "trace".parse::<Severity>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!("0".parse::<Severity>().is_err());
        assert!("6".parse::<Severity>().is_err());
    }

    #[test]
    fn test_severity_try_from_u8() {
        assert_eq!(Severity::try_from(1).unwrap(), Severity::Debug);
        assert_eq!(Severity::try_from(5).unwrap(), Severity::Fatal);

        let err: Error = Severity::try_from(0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(Severity::try_from(6).is_err());
    }

    #[test]
    fn test_record_keeps_its_time() {
        let time: Zoned = "2024-08-10T23:59:59[UTC]".parse().unwrap();
        let record = Record::new(time.clone(), Severity::Warn, format_args!("late"));
        assert_eq!(record.time(), &time);
        assert_eq!(record.severity(), Severity::Warn);
        assert!(record.call_site().is_none());
    }

    #[test]
    fn test_call_site_filename() {
        let site = CallSite::new("src/append/file/rolling.rs", 42);
        assert_eq!(site.filename(), "rolling.rs");
        assert_eq!(site.line(), 42);

        let bare = CallSite::new("main.rs", 7);
        assert_eq!(bare.filename(), "main.rs");
    }

    #[test]
    fn test_call_site_from_location() {
        let site = CallSite::from(Location::caller());
        assert_eq!(site.filename(), "record.rs");
        assert!(site.line() > 0);
    }
}
