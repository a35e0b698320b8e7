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

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use jiff::Zoned;

use crate::Error;
use crate::Trap;
use crate::append::Append;
use crate::append::Destination;
use crate::append::file::retention::Retention;
use crate::append::file::rolling::LogPath;
use crate::append::file::rolling::RollingFileWriter;
use crate::clock::Clock;
use crate::trap::DefaultTrap;

/// A builder for configuring [`RotatingFile`].
#[derive(Debug)]
pub struct RotatingFileBuilder {
    path: PathBuf,
    daily_rotate: bool,
    max_days: u64,
    clock: Clock,
    trap: Arc<dyn Trap>,
}

impl RotatingFileBuilder {
    /// Creates a new [`RotatingFileBuilder`] writing to `path`.
    ///
    /// Rotation is off by default.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            daily_rotate: false,
            max_days: 0,
            clock: Clock::default(),
            trap: Arc::new(DefaultTrap::default()),
        }
    }

    /// Sets whether the file is rotated when the calendar day changes.
    #[must_use]
    pub fn daily_rotate(mut self, daily_rotate: bool) -> Self {
        self.daily_rotate = daily_rotate;
        self
    }

    /// Sets the number of days rotated files are kept. `0` means
    /// [`DEFAULT_MAX_DAYS`](super::DEFAULT_MAX_DAYS).
    #[must_use]
    pub fn max_days(mut self, max_days: u64) -> Self {
        self.max_days = max_days;
        self
    }

    /// Sets the clock that dates a file left over from an earlier run.
    ///
    /// Day boundaries of later writes follow the time of each record.
    #[must_use]
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the trap that receives errors of the background sweep.
    #[must_use]
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        let trap: Box<dyn Trap> = trap.into();
        self.trap = Arc::from(trap);
        self
    }

    pub(crate) fn shared_trap(mut self, trap: Arc<dyn Trap>) -> Self {
        self.trap = trap;
        self
    }

    /// Opens the file, creating it and its parent directory as needed.
    pub fn build(self) -> Result<RotatingFile, Error> {
        let Self {
            path,
            daily_rotate,
            max_days,
            clock,
            trap,
        } = self;

        let path = LogPath::new(path)?;
        let retention = daily_rotate.then(|| Retention::from_log_path(path.clone(), max_days));
        let writer = RollingFileWriter::open(path, daily_rotate, &clock)?;

        Ok(RotatingFile {
            writer: Mutex::new(writer),
            retention,
            trap,
        })
    }
}

/// A sink that appends lines to a file and optionally rotates it once per day.
///
/// On the first record of a new day the active file is renamed to
/// `<dir>/<base><ext>.<YYYYMMDD>`, named after the day it holds, and a fresh file is opened at
/// the original path. If that archive already exists, the active file is appended to it instead.
/// Each rotation is followed by a sweep of expired files, see [`Retention`].
///
/// Lines are routed by the time their record was observed. A record stamped on an earlier day
/// than the active file, because another thread rotated in between, is appended to the archive
/// of its day.
///
/// Writes from any number of threads are serialized. A rotation happens at most once per day
/// change, and every line ends up whole in exactly one file.
#[derive(Debug)]
pub struct RotatingFile {
    writer: Mutex<RollingFileWriter>,
    retention: Option<Retention>,
    trap: Arc<dyn Trap>,
}

impl RotatingFile {
    /// Creates a new [`RotatingFileBuilder`].
    pub fn builder(path: impl Into<PathBuf>) -> RotatingFileBuilder {
        RotatingFileBuilder::new(path)
    }

    /// The path of the active file.
    pub fn path(&self) -> PathBuf {
        self.writer().log_path().active().to_path_buf()
    }

    /// The retention policy, if rotation is enabled.
    pub fn retention(&self) -> Option<&Retention> {
        self.retention.as_ref()
    }

    fn writer(&self) -> MutexGuard<'_, RollingFileWriter> {
        self.writer.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Append for RotatingFile {
    fn append(&self, time: &Zoned, line: &[u8]) -> Result<(), Error> {
        let (rotated, result) = {
            let mut writer = self.writer();
            match writer.rotate_if_needed(time) {
                Ok(rotated) => (rotated, writer.write_line(time, line)),
                Err(err) => (false, Err(err)),
            }
        };

        // sweep outside the lock so that writers are not held up by the disk walk
        if let (true, Some(retention)) = (rotated, &self.retention) {
            retention.sweep(time.timestamp(), self.trap.as_ref());
        }

        result
    }

    fn destination(&self) -> Destination {
        Destination::File
    }

    fn flush(&self) -> Result<(), Error> {
        self.writer().flush()
    }
}

impl Drop for RotatingFile {
    fn drop(&mut self) {
        let writer = self.writer.get_mut().unwrap_or_else(|e| e.into_inner());
        let _ = writer.flush();
    }
}
