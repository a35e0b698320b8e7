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
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use std::time::SystemTime;

use jiff::Timestamp;

use crate::Error;
use crate::ErrorKind;
use crate::Trap;
use crate::append::file::rolling::LogPath;

/// The retention window used when the configured one is `0`.
pub const DEFAULT_MAX_DAYS: u64 = 6;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Removes rotated log files older than the retention window.
///
/// Starting from the directory of the active file, the sweep walks all subdirectories and
/// considers regular files only. A file is removed when
///
/// * its name, after dropping a trailing `.YYYYMMDD` day key, starts with the base name of the
///   active file and ends with its extension;
/// * it is not the active file itself;
/// * it was last modified strictly before `now - max_days * 24h`.
///
/// Failures on single entries are reported to the [`Trap`] and the sweep goes on with the next
/// entry.
#[derive(Debug, Clone)]
pub struct Retention {
    path: LogPath,
    max_days: u64,
}

impl Retention {
    /// Create the retention policy of the log file at `active_path`.
    ///
    /// A `max_days` of `0` means [`DEFAULT_MAX_DAYS`].
    pub fn new(active_path: impl Into<PathBuf>, max_days: u64) -> Result<Self, Error> {
        let path = LogPath::new(active_path.into())?;
        Ok(Self::from_log_path(path, max_days))
    }

    pub(crate) fn from_log_path(path: LogPath, max_days: u64) -> Self {
        let max_days = if max_days == 0 {
            DEFAULT_MAX_DAYS
        } else {
            max_days
        };
        Self { path, max_days }
    }

    /// The retention window in days.
    pub fn max_days(&self) -> u64 {
        self.max_days
    }

    /// Whether a file named `filename` belongs to this log.
    pub fn matches(&self, filename: &str) -> bool {
        let stem = strip_day_key(filename);
        stem.starts_with(self.path.base_name()) && stem.ends_with(self.path.extension())
    }

    /// Remove every expired file as of `now`; return how many were removed.
    pub fn sweep(&self, now: Timestamp, trap: &dyn Trap) -> usize {
        let window = Duration::from_secs(self.max_days.saturating_mul(SECONDS_PER_DAY));
        let cutoff = SystemTime::from(now)
            .checked_sub(window)
            .unwrap_or(SystemTime::UNIX_EPOCH);

        let mut removed = 0;
        self.sweep_dir(self.path.dir(), cutoff, trap, &mut removed);
        removed
    }

    fn sweep_dir(&self, dir: &Path, cutoff: SystemTime, trap: &dyn Trap, removed: &mut usize) {
        let read_dir = match fs::read_dir(dir) {
            Ok(read_dir) => read_dir,
            Err(err) => {
                trap.trap(&sweep_error("failed to read log dir", dir, err));
                return;
            }
        };

        for entry in read_dir {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    trap.trap(&sweep_error("failed to read log dir entry", dir, err));
                    continue;
                }
            };

            let filepath = entry.path();
            // symlinks are neither followed nor removed
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(err) => {
                    trap.trap(&sweep_error("failed to stat old log", &filepath, err));
                    continue;
                }
            };
            if file_type.is_dir() {
                self.sweep_dir(&filepath, cutoff, trap, removed);
                continue;
            }
            if !file_type.is_file() {
                continue;
            }

            let filename = entry.file_name();
            // if the filename is not a UTF-8 string, skip it.
            let Some(filename) = filename.to_str() else {
                continue;
            };
            if !self.matches(filename) || self.is_active(dir, filename) {
                continue;
            }

            let modified = match entry.metadata().and_then(|m| m.modified()) {
                Ok(modified) => modified,
                Err(err) => {
                    trap.trap(&sweep_error("failed to stat old log", &filepath, err));
                    continue;
                }
            };
            if modified >= cutoff {
                continue;
            }

            match fs::remove_file(&filepath) {
                Ok(()) => *removed += 1,
                Err(err) => trap.trap(&sweep_error("failed to remove old log", &filepath, err)),
            }
        }
    }

    fn is_active(&self, dir: &Path, filename: &str) -> bool {
        dir == self.path.dir() && filename == self.path.active_filename()
    }
}

fn strip_day_key(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, key)) if key.len() == 8 && key.bytes().all(|b| b.is_ascii_digit()) => stem,
        _ => filename,
    }
}

fn sweep_error(message: &'static str, path: &Path, err: io::Error) -> Error {
    Error::new(ErrorKind::Sweep, message)
        .with_context("path", path.display())
        .with_source(err)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::fs::File;
    use std::path::Path;
    use std::sync::Mutex;
    use std::time::SystemTime;

    use jiff::Timestamp;
    use tempfile::TempDir;

    use super::*;

    #[derive(Debug, Default)]
    struct Collect(Mutex<Vec<ErrorKind>>);

    impl Trap for Collect {
        fn trap(&self, err: &Error) {
            self.0.lock().unwrap().push(err.kind());
        }
    }

    fn touch(path: &Path, modified: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let file = File::create(path).unwrap();
        let modified = modified.parse::<Timestamp>().unwrap();
        file.set_modified(SystemTime::from(modified)).unwrap();
    }

    #[test]
    fn test_matches_rotated_and_plain_names() {
        let retention = Retention::new("logs/app.log", 5).unwrap();
        assert!(retention.matches("app.log.20240101"));
        assert!(retention.matches("app.log"));
        assert!(retention.matches("app-old.log"));
        assert!(!retention.matches("app.log.2024"));
        assert!(!retention.matches("app.txt.20240101"));
        assert!(!retention.matches("other.log.20240101"));
        assert!(!retention.matches("notes.md"));
    }

    #[test]
    fn test_extensionless_log_defaults_to_dot_log() {
        let retention = Retention::new("service", 5).unwrap();
        assert!(retention.matches("service.log.20240101"));
        assert!(!retention.matches("service.20240101"));
    }

    #[test]
    fn test_zero_days_means_default() {
        let retention = Retention::new("app.log", 0).unwrap();
        assert_eq!(retention.max_days(), DEFAULT_MAX_DAYS);
    }

    #[test]
    fn test_sweep_removes_only_expired_matching_files() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();

        for day in 1..=10 {
            let name = format!("app.log.202401{day:02}");
            touch(&dir.join(name), &format!("2024-01-{day:02}T12:00:00Z"));
        }
        touch(&dir.join("other.log.20240101"), "2024-01-01T12:00:00Z");
        touch(&dir.join("app.txt.20240101"), "2024-01-01T12:00:00Z");
        touch(&dir.join("notes.md"), "2023-06-01T00:00:00Z");
        touch(&dir.join("archive/app.log.20240102"), "2024-01-02T12:00:00Z");
        // the active file is never swept, however old it looks
        touch(&dir.join("app.log"), "2023-12-01T00:00:00Z");

        let retention = Retention::new(dir.join("app.log"), 5).unwrap();
        let trap = Collect::default();
        let now = "2024-01-10T12:00:00Z".parse::<Timestamp>().unwrap();
        let removed = retention.sweep(now, &trap);

        assert_eq!(removed, 5);
        assert!(trap.0.lock().unwrap().is_empty());

        for day in 1..=4 {
            assert!(!dir.join(format!("app.log.202401{day:02}")).exists());
        }
        for day in 5..=10 {
            assert!(dir.join(format!("app.log.202401{day:02}")).exists());
        }
        assert!(!dir.join("archive/app.log.20240102").exists());
        assert!(dir.join("other.log.20240101").exists());
        assert!(dir.join("app.txt.20240101").exists());
        assert!(dir.join("notes.md").exists());
        assert!(dir.join("app.log").exists());
    }

    #[test]
    fn test_unreadable_directory_is_reported_not_raised() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing").join("app.log");

        let retention = Retention::new(missing, 5).unwrap();
        let trap = Collect::default();
        let removed = retention.sweep(Timestamp::now(), &trap);

        assert_eq!(removed, 0);
        assert_eq!(*trap.0.lock().unwrap(), vec![ErrorKind::Sweep]);
    }
}
