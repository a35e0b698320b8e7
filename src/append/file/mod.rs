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

//! Appending to files with optional daily rotation and retention.

pub use self::append::RotatingFile;
pub use self::append::RotatingFileBuilder;
pub use self::retention::DEFAULT_MAX_DAYS;
pub use self::retention::Retention;

mod append;
mod retention;
mod rolling;
