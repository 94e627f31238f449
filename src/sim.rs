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

//! Detects SIM card swaps and raises the SIM violation modal.
//!
//! The watcher has no view reference: it only talks to the [`AlertBridge`].

use crate::alert::{ActionCallback, AlertBridge, SimViolationOptions};
use log::{debug, info};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum SimStatus {
    Matching,
    Changed { expected: String, found: String },
    Removed { expected: String },
}

impl SimStatus {
    pub fn is_violation(&self) -> bool {
        !matches!(self, Self::Matching)
    }
}

struct WatchState {
    baseline: Option<String>,
    last_reported: Option<SimStatus>,
}

pub struct SimWatcher {
    bridge: Arc<AlertBridge>,
    state: Mutex<WatchState>,
    on_payment: Option<ActionCallback>,
    on_close: Option<ActionCallback>,
}

impl SimWatcher {
    /// `baseline` is the SIM identity registered for this device. When `None`,
    /// the first SIM observed becomes the baseline.
    pub fn new(bridge: Arc<AlertBridge>, baseline: Option<String>) -> Self {
        Self {
            bridge,
            state: Mutex::new(WatchState {
                baseline,
                last_reported: None,
            }),
            on_payment: None,
            on_close: None,
        }
    }

    pub fn on_payment<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_payment = Some(Arc::new(callback));
        self
    }

    pub fn on_close<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_close = Some(Arc::new(callback));
        self
    }

    pub fn baseline(&self) -> Option<String> {
        self.lock_state().baseline.clone()
    }

    /// Compares `current` with the baseline and raises the violation modal for
    /// each new violation. Repeated checks with the same result stay quiet.
    pub fn check(&self, current: Option<&str>) -> SimStatus {
        let (status, report) = {
            let mut state = self.lock_state();
            let baseline = state.baseline.clone();
            let status = match (baseline.as_deref(), current) {
                (None, Some(found)) => {
                    debug!("Recording SIM baseline");
                    state.baseline = Some(found.to_string());
                    SimStatus::Matching
                }
                (None, None) => SimStatus::Matching,
                (Some(expected), Some(found)) if expected == found => SimStatus::Matching,
                (Some(expected), Some(found)) => SimStatus::Changed {
                    expected: expected.to_string(),
                    found: found.to_string(),
                },
                (Some(expected), None) => SimStatus::Removed {
                    expected: expected.to_string(),
                },
            };

            let report =
                status.is_violation() && state.last_reported.as_ref() != Some(&status);
            state.last_reported = status.is_violation().then(|| status.clone());
            (status, report)
        };

        if report {
            info!("SIM card violation detected: {status:?}");
            let mut options = SimViolationOptions::new();
            if matches!(status, SimStatus::Removed { .. }) {
                options = options.message(
                    "The registered SIM card was removed. Reinsert it or settle the outstanding \
                     balance to keep using the device.",
                );
            }
            options.on_payment = self.on_payment.clone();
            options.on_close = self.on_close.clone();
            self.bridge.show_sim_card_violation(options);
        }
        status
    }

    fn lock_state(&self) -> MutexGuard<'_, WatchState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertKind;
    use crate::modal::ModalHost;

    fn watched(baseline: Option<&str>) -> (SimWatcher, Arc<ModalHost>, crate::modal::MountedHost) {
        let bridge = Arc::new(AlertBridge::default());
        let host = ModalHost::headless();
        let mounted = host.mount(&bridge);
        let watcher = SimWatcher::new(bridge, baseline.map(str::to_string));
        (watcher, host, mounted)
    }

    #[test]
    fn first_sim_becomes_baseline() {
        let (watcher, host, _mounted) = watched(None);
        assert_eq!(watcher.check(Some("8901")), SimStatus::Matching);
        assert_eq!(watcher.baseline().as_deref(), Some("8901"));
        assert!(!host.is_visible());
    }

    #[test]
    fn swapped_sim_raises_violation_once() {
        let (watcher, host, _mounted) = watched(Some("8901"));

        let status = watcher.check(Some("4402"));
        assert!(status.is_violation());
        assert_eq!(host.current_kind(), Some(AlertKind::SimCardViolation));

        host.hide_modal();
        watcher.check(Some("4402"));
        assert!(!host.is_visible());
    }

    #[test]
    fn removal_is_reported_with_its_own_message() {
        let (watcher, host, _mounted) = watched(Some("8901"));
        let status = watcher.check(None);
        assert_eq!(
            status,
            SimStatus::Removed {
                expected: "8901".to_string()
            }
        );
        assert!(host.current_view().unwrap().message.contains("removed"));
    }

    #[test]
    fn restoring_sim_rearms_detection() {
        let (watcher, host, _mounted) = watched(Some("8901"));
        watcher.check(Some("4402"));
        host.hide_modal();
        assert_eq!(watcher.check(Some("8901")), SimStatus::Matching);
        watcher.check(Some("4402"));
        assert!(host.is_visible());
    }

    #[test]
    fn payment_callback_is_wired_to_pay_button() {
        let bridge = Arc::new(AlertBridge::default());
        let host = ModalHost::headless();
        let _mounted = host.mount(&bridge);
        let paid = Arc::new(Mutex::new(false));
        let flag = paid.clone();
        let watcher = SimWatcher::new(bridge, Some("8901".to_string())).on_payment(move || {
            *flag.lock().unwrap() = true;
        });

        watcher.check(Some("4402"));
        assert!(host.invoke(0));
        assert!(*paid.lock().unwrap());
    }
}
