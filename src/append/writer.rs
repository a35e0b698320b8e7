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

use std::fmt;
use std::io;
use std::io::Write;
use std::sync::Mutex;
use std::sync::MutexGuard;

use jiff::Zoned;

use crate::Error;
use crate::append::Append;

/// A sink over an arbitrary stream.
///
/// Lines are serialized through a mutex, so concurrent records never interleave. Each line is
/// flushed to the stream once written.
///
/// # Examples
///
/// ```
/// use std::io;
///
/// use dailylog::append::Writer;
///
/// // a sink that discards everything
/// let discard = Writer::new(io::sink());
/// ```
pub struct Writer<W> {
    inner: Mutex<W>,
}

impl<W: Write + Send + 'static> Writer<W> {
    /// Create a sink writing to `inner`.
    pub fn new(inner: W) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Consume the sink and return the stream.
    pub fn into_inner(self) -> W {
        self.inner.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    fn inner(&self) -> MutexGuard<'_, W> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<W> fmt::Debug for Writer<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writer").finish_non_exhaustive()
    }
}

impl<W: Write + Send + 'static> Append for Writer<W> {
    fn append(&self, _: &Zoned, line: &[u8]) -> Result<(), Error> {
        let mut inner = self.inner();
        inner.write_all(line).map_err(Error::from_io_error)?;
        inner.flush().map_err(Error::from_io_error)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), Error> {
        self.inner().flush().map_err(Error::from_io_error)
    }
}

impl Default for Writer<io::Sink> {
    fn default() -> Self {
        Writer::new(io::sink())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[derive(Debug)]
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("broken pipe"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_lines_reach_the_stream() {
        let now = Zoned::now();
        let writer = Writer::new(Vec::new());
        writer.append(&now, b"one\n").unwrap();
        writer.append(&now, b"two\n").unwrap();
        assert_eq!(writer.into_inner(), b"one\ntwo\n");
    }

    #[test]
    fn test_write_failure_is_surfaced() {
        let writer = Writer::new(Broken);
        let err = writer.append(&Zoned::now(), b"lost?\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Write);
    }
}
