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

//! Sinks that formatted lines are written to.

use std::fmt;

use jiff::Zoned;

use crate::Error;

pub mod file;
mod stdio;
mod writer;

pub use self::file::RotatingFile;
pub use self::file::RotatingFileBuilder;
pub use self::stdio::Stderr;
pub use self::stdio::Stdout;
pub use self::writer::Writer;

/// The kind of destination a sink writes to.
///
/// Layouts use it to decide whether coloring applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    /// An arbitrary stream, such as stdout or an in-memory buffer.
    Stream,
    /// A file opened by path, with or without rotation.
    File,
}

/// A sink that writes formatted lines.
pub trait Append: fmt::Debug + Send + Sync + 'static {
    /// Write one formatted line, including its trailing newline.
    ///
    /// `time` is the time the record was observed at. Sinks that split output by time, such as
    /// [`RotatingFile`], route the line by it rather than by the time of the write.
    fn append(&self, time: &Zoned, line: &[u8]) -> Result<(), Error>;

    /// The kind of destination this sink writes to.
    ///
    /// Default to [`Destination::Stream`].
    fn destination(&self) -> Destination {
        Destination::Stream
    }

    /// Flush any buffered lines.
    ///
    /// Default to a no-op.
    fn flush(&self) -> Result<(), Error> {
        Ok(())
    }
}

impl<T: Append> From<T> for Box<dyn Append> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}
