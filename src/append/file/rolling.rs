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

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;

use jiff::Timestamp;
use jiff::Zoned;

use crate::Error;
use crate::ErrorKind;
use crate::clock::Clock;

const DEFAULT_EXTENSION: &str = ".log";
const DAY_KEY_FORMAT: &str = "%Y%m%d";

/// The pieces of a log file path that rotation and retention derive names from.
#[derive(Debug, Clone)]
pub(crate) struct LogPath {
    active: PathBuf,
    dir: PathBuf,
    active_filename: String,
    base_name: String,
    extension: String,
}

impl LogPath {
    pub(crate) fn new(active: PathBuf) -> Result<Self, Error> {
        let Some(active_filename) = active.file_name() else {
            return Err(Error::new(ErrorKind::Construction, "log path has no file name")
                .with_context("path", active.display()));
        };
        let active_filename = active_filename.to_string_lossy().into_owned();

        let (base_name, extension) = match active.extension() {
            Some(ext) => {
                let base_name = active
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default();
                (base_name, format!(".{}", ext.to_string_lossy()))
            }
            None => (active_filename.clone(), DEFAULT_EXTENSION.to_string()),
        };

        let dir = match active.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(LogPath {
            active,
            dir,
            active_filename,
            base_name,
            extension,
        })
    }

    pub(crate) fn active(&self) -> &Path {
        &self.active
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    pub(crate) fn active_filename(&self) -> &str {
        &self.active_filename
    }

    pub(crate) fn base_name(&self) -> &str {
        &self.base_name
    }

    pub(crate) fn extension(&self) -> &str {
        &self.extension
    }

    /// `<dir>/<base><ext>.<day_key>`
    pub(crate) fn backup(&self, day_key: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}.{day_key}", self.base_name, self.extension))
    }
}

/// The file handle behind a [`RotatingFile`](super::RotatingFile) together with its rotation
/// state.
///
/// Every decision is keyed on the time the record was observed, not on the time of the write.
/// A record from a later day rotates the file. A record from an earlier day, stamped before a
/// concurrent writer rotated, never rotates back; it is appended to the archive of its own day.
///
/// Not thread safe on its own; the sink keeps it behind a mutex.
#[derive(Debug)]
pub(crate) struct RollingFileWriter {
    state: State,
    writer: Option<File>,
}

#[derive(Debug)]
struct State {
    path: LogPath,
    daily_rotate: bool,
    day_key: String,
}

impl RollingFileWriter {
    pub(crate) fn open(path: LogPath, daily_rotate: bool, clock: &Clock) -> Result<Self, Error> {
        fs::create_dir_all(path.dir()).map_err(|err| {
            Error::new(ErrorKind::Construction, "failed to create log directory")
                .with_context("path", path.dir().display())
                .with_source(err)
        })?;

        let file = open_log_file(path.active()).map_err(|err| {
            Error::new(ErrorKind::Construction, "failed to open log file")
                .with_context("path", path.active().display())
                .with_source(err)
        })?;

        let now = clock.now();
        let mut day_key = day_key(&now);
        // a non-empty file left over from an earlier day is archived under that day
        if let Some(existing) = existing_day_key(&file, &now) {
            if existing < day_key {
                day_key = existing;
            }
        }

        Ok(RollingFileWriter {
            state: State {
                path,
                daily_rotate,
                day_key,
            },
            writer: Some(file),
        })
    }

    /// Rotate the file if `now` falls on a later day than the active file.
    ///
    /// Returns whether the file was rotated.
    pub(crate) fn rotate_if_needed(&mut self, now: &Zoned) -> Result<bool, Error> {
        if !self.state.daily_rotate {
            return Ok(false);
        }
        if self.writer.is_none() {
            return Err(unavailable());
        }

        let today = day_key(now);
        if today <= self.state.day_key {
            return Ok(false);
        }

        self.rotate(today)?;
        Ok(true)
    }

    fn rotate(&mut self, today: String) -> Result<(), Error> {
        // the handle must be closed before the file is moved
        drop(self.writer.take());

        let active = self.state.path.active();
        let backup = self.state.path.backup(&self.state.day_key);
        archive(active, &backup).map_err(|err| {
            Error::new(ErrorKind::Rotation, "failed to archive log file")
                .with_context("from", active.display())
                .with_context("to", backup.display())
                .with_source(err)
        })?;

        let file = open_log_file(active).map_err(|err| {
            Error::new(ErrorKind::Rotation, "failed to reopen log file")
                .with_context("path", active.display())
                .with_source(err)
        })?;

        self.writer = Some(file);
        self.state.day_key = today;
        Ok(())
    }

    /// Write `line`, observed at `now`, to the file of its day.
    pub(crate) fn write_line(&mut self, now: &Zoned, line: &[u8]) -> Result<(), Error> {
        let writer = self.writer.as_mut().ok_or_else(unavailable)?;

        if self.state.daily_rotate {
            let key = day_key(now);
            if key < self.state.day_key {
                let backup = self.state.path.backup(&key);
                return append_to(&backup, line).map_err(|err| {
                    Error::from_io_error(err).with_context("path", backup.display())
                });
            }
        }

        writer.write_all(line).map_err(Error::from_io_error)
    }

    pub(crate) fn flush(&mut self) -> Result<(), Error> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush().map_err(Error::from_io_error),
            None => Ok(()),
        }
    }

    #[cfg(test)]
    fn day_key(&self) -> &str {
        &self.state.day_key
    }

    pub(crate) fn log_path(&self) -> &LogPath {
        &self.state.path
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)
}

/// Move the active file to `backup`. An existing archive is appended to, never replaced.
fn archive(active: &Path, backup: &Path) -> io::Result<()> {
    match fs::symlink_metadata(backup) {
        Ok(_) => {
            let mut from = File::open(active)?;
            let mut to = OpenOptions::new().append(true).open(backup)?;
            io::copy(&mut from, &mut to)?;
            fs::remove_file(active)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => fs::rename(active, backup),
        Err(err) => Err(err),
    }
}

fn append_to(path: &Path, line: &[u8]) -> io::Result<()> {
    open_log_file(path)?.write_all(line)
}

fn day_key(now: &Zoned) -> String {
    now.strftime(DAY_KEY_FORMAT).to_string()
}

fn existing_day_key(file: &File, now: &Zoned) -> Option<String> {
    let metadata = file.metadata().ok()?;
    if metadata.len() == 0 {
        return None;
    }
    let modified: SystemTime = metadata.modified().ok()?;
    let modified = Timestamp::try_from(modified).ok()?;
    Some(day_key(&modified.to_zoned(now.time_zone().clone())))
}

fn unavailable() -> Error {
    Error::new(
        ErrorKind::Rotation,
        "log file unavailable after failed rotation",
    )
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::time::SystemTime;

    use jiff::Timestamp;
    use jiff::Zoned;
    use jiff::tz::TimeZone;
    use tempfile::TempDir;

    use super::*;
    use crate::clock::ManualClock;

    fn utc(time: &str) -> Zoned {
        time.parse::<Timestamp>().unwrap().to_zoned(TimeZone::UTC)
    }

    fn open(path: &Path, now: &Zoned) -> RollingFileWriter {
        let path = LogPath::new(path.to_path_buf()).unwrap();
        let clock = Clock::manual(ManualClock::new(now.clone()));
        RollingFileWriter::open(path, true, &clock).unwrap()
    }

    fn write(writer: &mut RollingFileWriter, now: &Zoned, line: &str) {
        writer.rotate_if_needed(now).unwrap();
        writer.write_line(now, line.as_bytes()).unwrap();
    }

    #[test]
    fn test_log_path_names() {
        let path = LogPath::new(PathBuf::from("logs/app.log")).unwrap();
        assert_eq!(path.dir(), Path::new("logs"));
        assert_eq!(path.base_name(), "app");
        assert_eq!(path.extension(), ".log");
        assert_eq!(
            path.backup("20240810"),
            Path::new("logs").join("app.log.20240810")
        );

        let path = LogPath::new(PathBuf::from("service")).unwrap();
        assert_eq!(path.dir(), Path::new("."));
        assert_eq!(path.base_name(), "service");
        assert_eq!(path.extension(), ".log");
        assert_eq!(
            path.backup("20240810"),
            Path::new(".").join("service.log.20240810")
        );
    }

    #[test]
    fn test_rotation_on_day_boundary() {
        let temp_dir = TempDir::new().unwrap();
        let active = temp_dir.path().join("app.log");
        let day_one = utc("2024-08-10T23:00:00Z");
        let mut writer = open(&active, &day_one);

        for _ in 0..3 {
            assert!(!writer.rotate_if_needed(&day_one).unwrap());
            writer.write_line(&day_one, b"day one\n").unwrap();
        }

        let day_two = utc("2024-08-11T01:00:00Z");
        assert!(writer.rotate_if_needed(&day_two).unwrap());
        writer.write_line(&day_two, b"day two\n").unwrap();
        assert_eq!(writer.day_key(), "20240811");

        let backup = temp_dir.path().join("app.log.20240810");
        assert_eq!(
            fs::read_to_string(backup).unwrap(),
            "day one\nday one\nday one\n"
        );
        assert_eq!(fs::read_to_string(&active).unwrap(), "day two\n");
    }

    #[test]
    fn test_rotation_check_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = open(
            &temp_dir.path().join("app.log"),
            &utc("2024-08-10T12:00:00Z"),
        );
        writer
            .write_line(&utc("2024-08-10T12:00:00Z"), b"line\n")
            .unwrap();

        let later = utc("2024-08-12T12:00:00Z");
        assert!(writer.rotate_if_needed(&later).unwrap());
        assert!(!writer.rotate_if_needed(&later).unwrap());
        assert!(
            !writer
                .rotate_if_needed(&utc("2024-08-12T23:59:59Z"))
                .unwrap()
        );

        let entries = fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(entries, 2);
    }

    #[test]
    fn test_late_record_goes_to_its_own_day() {
        let temp_dir = TempDir::new().unwrap();
        let active = temp_dir.path().join("app.log");
        let day_one = utc("2024-08-10T23:59:59Z");
        let day_two = utc("2024-08-11T00:00:01Z");
        let mut writer = open(&active, &day_one);

        write(&mut writer, &day_one, "first\n");
        write(&mut writer, &day_two, "second\n");
        // stamped on day one, written after the rotation
        write(&mut writer, &day_one, "late\n");
        write(&mut writer, &day_two, "third\n");

        assert_eq!(writer.day_key(), "20240811");
        let backup = temp_dir.path().join("app.log.20240810");
        assert_eq!(fs::read_to_string(backup).unwrap(), "first\nlate\n");
        assert_eq!(fs::read_to_string(&active).unwrap(), "second\nthird\n");
    }

    #[test]
    fn test_disabled_rotation_keeps_one_file() {
        let temp_dir = TempDir::new().unwrap();
        let active = temp_dir.path().join("app.log");
        let path = LogPath::new(active.clone()).unwrap();
        let mut writer = RollingFileWriter::open(path, false, &Clock::default()).unwrap();

        write(&mut writer, &utc("2024-08-10T12:00:00Z"), "first\n");
        write(&mut writer, &utc("2024-08-11T12:00:00Z"), "second\n");
        write(&mut writer, &utc("2024-08-09T12:00:00Z"), "third\n");

        assert_eq!(
            fs::read_to_string(&active).unwrap(),
            "first\nsecond\nthird\n"
        );
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_extensionless_backup_name() {
        let temp_dir = TempDir::new().unwrap();
        let active = temp_dir.path().join("service");
        let day_one = utc("2024-08-10T12:00:00Z");
        let mut writer = open(&active, &day_one);

        write(&mut writer, &day_one, "before\n");
        write(&mut writer, &utc("2024-08-11T12:00:00Z"), "after\n");

        let backup = temp_dir.path().join("service.log.20240810");
        assert_eq!(fs::read_to_string(backup).unwrap(), "before\n");
        assert_eq!(fs::read_to_string(&active).unwrap(), "after\n");
    }

    #[test]
    fn test_existing_archive_is_appended_to() {
        let temp_dir = TempDir::new().unwrap();
        let active = temp_dir.path().join("app.log");
        let backup = temp_dir.path().join("app.log.20240810");
        fs::write(&backup, "archived earlier\n").unwrap();

        let day_one = utc("2024-08-10T12:00:00Z");
        let mut writer = open(&active, &day_one);
        write(&mut writer, &day_one, "day one\n");
        write(&mut writer, &utc("2024-08-11T12:00:00Z"), "day two\n");

        assert_eq!(
            fs::read_to_string(&backup).unwrap(),
            "archived earlier\nday one\n"
        );
        assert_eq!(fs::read_to_string(&active).unwrap(), "day two\n");
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_failed_archive_leaves_sink_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let active = temp_dir.path().join("app.log");
        let day_one = utc("2024-08-10T12:00:00Z");
        let mut writer = open(&active, &day_one);
        write(&mut writer, &day_one, "line\n");

        // a directory in the way cannot be archived into
        let blocker = temp_dir.path().join("app.log.20240810");
        fs::create_dir_all(blocker.join("occupied")).unwrap();

        let day_two = utc("2024-08-11T12:00:00Z");
        let err = writer.rotate_if_needed(&day_two).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Rotation);

        let err = writer.write_line(&day_two, b"lost\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Rotation);

        // no retry once degraded
        fs::remove_dir_all(&blocker).unwrap();
        let err = writer.rotate_if_needed(&day_two).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Rotation);
        assert_eq!(fs::read_to_string(&active).unwrap(), "line\n");
    }

    #[test]
    fn test_existing_file_keeps_its_own_day() {
        let temp_dir = TempDir::new().unwrap();
        let active = temp_dir.path().join("app.log");
        fs::write(&active, "yesterday\n").unwrap();
        let modified = "2024-08-09T12:00:00Z".parse::<Timestamp>().unwrap();
        fs::File::options()
            .write(true)
            .open(&active)
            .unwrap()
            .set_modified(SystemTime::from(modified))
            .unwrap();

        let today = utc("2024-08-10T08:00:00Z");
        let mut writer = open(&active, &today);
        assert_eq!(writer.day_key(), "20240809");

        assert!(writer.rotate_if_needed(&today).unwrap());
        writer.write_line(&today, b"today\n").unwrap();

        let backup = temp_dir.path().join("app.log.20240809");
        assert_eq!(fs::read_to_string(backup).unwrap(), "yesterday\n");
        assert_eq!(fs::read_to_string(&active).unwrap(), "today\n");
    }

    #[test]
    fn test_empty_existing_file_uses_today() {
        let temp_dir = TempDir::new().unwrap();
        let active = temp_dir.path().join("app.log");
        fs::write(&active, "").unwrap();

        let writer = open(&active, &utc("2024-08-10T08:00:00Z"));
        assert_eq!(writer.day_key(), "20240810");
    }

    #[test]
    fn test_open_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let active = temp_dir.path().join("a").join("b").join("app.log");
        let now = utc("2024-08-10T08:00:00Z");
        let mut writer = open(&active, &now);
        write(&mut writer, &now, "nested\n");
        assert_eq!(fs::read_to_string(&active).unwrap(), "nested\n");
    }

    #[test]
    fn test_open_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = LogPath::new(temp_dir.path().to_path_buf()).unwrap();
        let err = RollingFileWriter::open(path, true, &Clock::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Construction);
    }
}
