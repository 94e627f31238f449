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

//! Platform capability that pins the device into a single app.

use crate::error::{KioskError, Result};
use log::debug;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Enters and exits the platform lock task (kiosk mode).
///
/// Each call resolves exactly once. A returned error means the device is still
/// in the state it was in before the call.
#[cfg_attr(test, mockall::automock)]
pub trait PlatformLock: Send + Sync {
    fn lock(&self) -> Result<()>;

    fn unlock(&self) -> Result<()>;
}

/// For platforms without a lock task API. Always succeeds.
#[derive(Debug, Default)]
pub struct NoopPlatformLock;

impl NoopPlatformLock {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformLock for NoopPlatformLock {
    fn lock(&self) -> Result<()> {
        debug!("Lock task unavailable on this platform; treating lock as applied");
        Ok(())
    }

    fn unlock(&self) -> Result<()> {
        debug!("Lock task unavailable on this platform; treating unlock as applied");
        Ok(())
    }
}

/// Lock task stand-in for demos and tests. Failures can be armed one call at a time.
#[derive(Debug, Default)]
pub struct SimulatedLockTask {
    fail_next_lock: AtomicBool,
    fail_next_unlock: AtomicBool,
    lock_calls: AtomicUsize,
    unlock_calls: AtomicUsize,
}

impl SimulatedLockTask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_lock(&self) {
        self.fail_next_lock.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_unlock(&self) {
        self.fail_next_unlock.store(true, Ordering::SeqCst);
    }

    pub fn lock_calls(&self) -> usize {
        self.lock_calls.load(Ordering::SeqCst)
    }

    pub fn unlock_calls(&self) -> usize {
        self.unlock_calls.load(Ordering::SeqCst)
    }
}

impl PlatformLock for SimulatedLockTask {
    fn lock(&self) -> Result<()> {
        self.lock_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next_lock.swap(false, Ordering::SeqCst) {
            return Err(KioskError::PlatformLockFailure(
                "device policy controller rejected startLockTask".to_string(),
            ));
        }
        Ok(())
    }

    fn unlock(&self) -> Result<()> {
        self.unlock_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next_unlock.swap(false, Ordering::SeqCst) {
            return Err(KioskError::PlatformUnlockFailure(
                "device policy controller rejected stopLockTask".to_string(),
            ));
        }
        Ok(())
    }
}
