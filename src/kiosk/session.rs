// Copyright 2025 dentsusoken
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

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    Unlocked,
    PendingConfirmation,
    Locked,
}

impl LockState {
    /// Hardware back/home is intercepted from the moment a lock is requested.
    pub fn intercepts_home(self) -> bool {
        matches!(self, Self::PendingConfirmation | Self::Locked)
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlocked => write!(f, "unlocked"),
            Self::PendingConfirmation => write!(f, "pending confirmation"),
            Self::Locked => write!(f, "locked"),
        }
    }
}

/// Lock status for the current app session. Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct LockSession {
    state: LockState,
    home_intercept_enabled: bool,
    changed_at: DateTime<Utc>,
}

impl LockSession {
    pub fn new() -> Self {
        Self {
            state: LockState::Unlocked,
            home_intercept_enabled: LockState::Unlocked.intercepts_home(),
            changed_at: Utc::now(),
        }
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn home_intercept_enabled(&self) -> bool {
        self.home_intercept_enabled
    }

    pub fn changed_at(&self) -> DateTime<Utc> {
        self.changed_at
    }

    /// Moves to `next` and returns the previous state.
    pub(crate) fn transition(&mut self, next: LockState) -> LockState {
        let previous = self.state;
        self.state = next;
        self.home_intercept_enabled = next.intercepts_home();
        self.changed_at = Utc::now();
        previous
    }
}

impl Default for LockSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unlocked_without_interception() {
        let session = LockSession::new();
        assert_eq!(session.state(), LockState::Unlocked);
        assert!(!session.home_intercept_enabled());
    }

    #[test]
    fn intercept_flag_follows_state() {
        let mut session = LockSession::new();
        for (next, expected) in [
            (LockState::PendingConfirmation, true),
            (LockState::Locked, true),
            (LockState::Unlocked, false),
        ] {
            session.transition(next);
            assert_eq!(session.home_intercept_enabled(), expected, "state {next}");
        }
    }

    #[test]
    fn transition_returns_previous_state() {
        let mut session = LockSession::new();
        let before = session.changed_at();
        let previous = session.transition(LockState::PendingConfirmation);
        assert_eq!(previous, LockState::Unlocked);
        assert!(session.changed_at() >= before);
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&LockState::PendingConfirmation).unwrap();
        assert_eq!(json, "\"pending_confirmation\"");
    }
}
