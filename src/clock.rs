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

//! Sources of the current time.

use std::sync::Arc;
use std::sync::Mutex;

use jiff::Timestamp;
use jiff::Zoned;
use jiff::tz::TimeZone;

/// Where the logger and the rotating sink read "now" from.
///
/// Both day boundaries and record timestamps are computed in the time zone of the clock.
#[derive(Debug, Clone)]
pub enum Clock {
    /// The system clock, in the given time zone.
    System(TimeZone),
    /// A clock that only moves when told to.
    Manual(ManualClock),
}

impl Default for Clock {
    fn default() -> Self {
        Clock::system()
    }
}

impl Clock {
    /// The system clock in the system time zone.
    pub fn system() -> Self {
        Clock::System(TimeZone::system())
    }

    /// The system clock in the given time zone.
    pub fn system_in(tz: TimeZone) -> Self {
        Clock::System(tz)
    }

    /// A manually driven clock. See [`ManualClock`].
    pub fn manual(clock: ManualClock) -> Self {
        Clock::Manual(clock)
    }

    /// The current time.
    pub fn now(&self) -> Zoned {
        match self {
            Clock::System(tz) => Timestamp::now().to_zoned(tz.clone()),
            Clock::Manual(clock) => clock.now(),
        }
    }
}

/// The time could be reset.
///
/// Clones share the same instant, so a test can keep one handle and move time forward while a
/// logger holds another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Zoned>>,
}

impl ManualClock {
    /// Create a clock stopped at `now`.
    pub fn new(now: Zoned) -> ManualClock {
        ManualClock {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// The instant the clock is stopped at.
    pub fn now(&self) -> Zoned {
        self.now.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Move the clock to `now`.
    pub fn set_now(&self, now: Zoned) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_manual_clock_adjusting() {
        let now = Zoned::from_str("2024-08-10T17:12:52+08:00[+08:00]").unwrap();
        let clock = ManualClock::new(now.clone());
        assert_eq!(clock.now(), now);

        let shared = Clock::manual(clock.clone());
        let now = Zoned::from_str("2024-01-01T12:00:00+08:00[+08:00]").unwrap();
        clock.set_now(now.clone());
        assert_eq!(shared.now(), now);
    }

    #[test]
    fn test_system_clock_uses_time_zone() {
        let clock = Clock::system_in(TimeZone::UTC);
        assert_eq!(clock.now().offset(), jiff::tz::Offset::UTC);
    }
}
