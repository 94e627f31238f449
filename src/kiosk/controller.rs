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

//! Kiosk lock state machine.
//!
//! ```text
//! Unlocked --request_lock--> PendingConfirmation --confirm_lock--> Locked
//!     ^                            |                                  |
//!     +--------cancel_lock---------+                                  |
//!     +-------------------------------unlock--------------------------+
//! ```
//!
//! Platform calls happen outside the state lock. While one is outstanding every
//! other transition is ignored, and a failed call leaves the state untouched.

use crate::alert::{Affordance, AlertAction, AlertBridge, AlertState};
use crate::config::KioskSettings;
use crate::error::{ErrorContext, KioskError, Result};
use crate::kiosk::back::{BackEventSource, BackHandler, BackSubscription, KioskBackHandler};
use crate::kiosk::platform::PlatformLock;
use crate::kiosk::session::{LockSession, LockState};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// Receives every committed lock state change.
pub trait LockStateObserver: Send + Sync {
    fn on_state_changed(&self, previous: LockState, current: LockState);
}

impl<F> LockStateObserver for F
where
    F: Fn(LockState, LockState) + Send + Sync,
{
    fn on_state_changed(&self, previous: LockState, current: LockState) {
        self(previous, current)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Applied,
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A platform lock or unlock call has not resolved yet.
    InFlight,
    /// The transition does not start from the current state.
    NotApplicable(LockState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlatformOp {
    Lock,
    Unlock,
}

struct ControllerState {
    session: LockSession,
    in_flight: Option<PlatformOp>,
    back_subscription: Option<BackSubscription>,
}

type StateChange = (LockState, LockState);

pub struct LockController {
    me: Weak<LockController>,
    bridge: Arc<AlertBridge>,
    platform: Arc<dyn PlatformLock>,
    back_events: Arc<dyn BackEventSource>,
    back_handler: Arc<dyn BackHandler>,
    settings: KioskSettings,
    inner: Mutex<ControllerState>,
    observers: Mutex<Vec<(ObserverId, Arc<dyn LockStateObserver>)>>,
    next_observer: AtomicU64,
}

impl LockController {
    pub fn new(
        bridge: Arc<AlertBridge>,
        platform: Arc<dyn PlatformLock>,
        back_events: Arc<dyn BackEventSource>,
        settings: KioskSettings,
    ) -> Arc<Self> {
        Arc::new_cyclic(|me: &Weak<LockController>| {
            let back_handler: Arc<dyn BackHandler> = Arc::new(
                KioskBackHandler::new(bridge.clone(), &settings).on_acknowledge({
                    let me = me.clone();
                    move || {
                        if let Some(controller) = me.upgrade() {
                            controller.resume_confirmation();
                        }
                    }
                }),
            );
            Self {
                me: me.clone(),
                bridge,
                platform,
                back_events,
                back_handler,
                settings,
                inner: Mutex::new(ControllerState {
                    session: LockSession::new(),
                    in_flight: None,
                    back_subscription: None,
                }),
                observers: Mutex::new(Vec::new()),
                next_observer: AtomicU64::new(0),
            }
        })
    }

    pub fn state(&self) -> LockState {
        self.lock_inner().session.state()
    }

    pub fn session(&self) -> LockSession {
        self.lock_inner().session.clone()
    }

    pub fn home_intercept_enabled(&self) -> bool {
        self.lock_inner().session.home_intercept_enabled()
    }

    pub fn is_transition_in_flight(&self) -> bool {
        self.lock_inner().in_flight.is_some()
    }

    pub fn back_handler_registered(&self) -> bool {
        self.lock_inner().back_subscription.is_some()
    }

    pub fn subscribe(&self, observer: Arc<dyn LockStateObserver>) -> ObserverId {
        let id = ObserverId(self.next_observer.fetch_add(1, Ordering::Relaxed));
        self.lock_observers().push((id, observer));
        id
    }

    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut observers = self.lock_observers();
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    /// Starts the two-step lock: moves to `PendingConfirmation` and shows the
    /// confirmation modal. Calling it again while pending only re-shows the modal.
    pub fn request_lock(&self) -> TransitionOutcome {
        let (outcome, change) = {
            let mut inner = self.lock_inner();
            if inner.in_flight.is_some() {
                debug!("Ignoring lock request while a platform call is in flight");
                return TransitionOutcome::Ignored(IgnoreReason::InFlight);
            }
            match inner.session.state() {
                LockState::Unlocked => {
                    let change = self.commit(&mut inner, LockState::PendingConfirmation);
                    (TransitionOutcome::Applied, Some(change))
                }
                LockState::PendingConfirmation => (
                    TransitionOutcome::Ignored(IgnoreReason::NotApplicable(
                        LockState::PendingConfirmation,
                    )),
                    None,
                ),
                LockState::Locked => {
                    debug!("Ignoring lock request; device already locked");
                    return TransitionOutcome::Ignored(IgnoreReason::NotApplicable(
                        LockState::Locked,
                    ));
                }
            }
        };

        if let Some(change) = change {
            self.notify(change);
        }
        self.bridge.show(self.confirmation_state());
        outcome
    }

    /// Asks the platform to lock. `Locked` is entered only after the call succeeds.
    pub fn confirm_lock(&self) -> Result<TransitionOutcome> {
        if let Some(ignored) = self.begin(PlatformOp::Lock, LockState::PendingConfirmation) {
            return Ok(ignored);
        }

        let result = self.platform.lock().map_err(|err| match err {
            KioskError::PlatformLockFailure(_) => err,
            other => KioskError::PlatformLockFailure(other.to_string()),
        });
        let change = self.finish(result.is_ok().then_some(LockState::Locked));

        match result {
            Ok(()) => {
                info!("Kiosk mode enabled");
                if let Some(change) = change {
                    self.notify(change);
                }
                self.bridge.show_success(
                    self.settings.locked_title.clone(),
                    self.settings.locked_message.clone(),
                    Vec::new(),
                );
                Ok(TransitionOutcome::Applied)
            }
            Err(err) => {
                warn!("Platform lock failed; staying in confirmation: {err}");
                self.report_failure(&err, PlatformOp::Lock);
                Err(err)
            }
        }
    }

    pub fn cancel_lock(&self) -> TransitionOutcome {
        let change = {
            let mut inner = self.lock_inner();
            if inner.in_flight.is_some() {
                debug!("Ignoring cancel while a platform call is in flight");
                return TransitionOutcome::Ignored(IgnoreReason::InFlight);
            }
            let state = inner.session.state();
            if state != LockState::PendingConfirmation {
                return TransitionOutcome::Ignored(IgnoreReason::NotApplicable(state));
            }
            self.commit(&mut inner, LockState::Unlocked)
        };

        debug!("Lock request cancelled");
        self.notify(change);
        TransitionOutcome::Applied
    }

    /// Asks the platform to unlock. The state stays `Locked` if the call fails.
    pub fn unlock(&self) -> Result<TransitionOutcome> {
        if let Some(ignored) = self.begin(PlatformOp::Unlock, LockState::Locked) {
            return Ok(ignored);
        }

        let result = self.platform.unlock().map_err(|err| match err {
            KioskError::PlatformUnlockFailure(_) => err,
            other => KioskError::PlatformUnlockFailure(other.to_string()),
        });
        let change = self.finish(result.is_ok().then_some(LockState::Unlocked));

        match result {
            Ok(()) => {
                info!("Kiosk mode disabled");
                if let Some(change) = change {
                    self.notify(change);
                }
                self.bridge.show_success(
                    self.settings.unlocked_title.clone(),
                    self.settings.unlocked_message.clone(),
                    Vec::new(),
                );
                Ok(TransitionOutcome::Applied)
            }
            Err(err) => {
                warn!("Platform unlock failed; device remains locked: {err}");
                self.report_failure(&err, PlatformOp::Unlock);
                Err(err)
            }
        }
    }

    /// Claims the in-flight slot, or explains why the transition is ignored.
    fn begin(&self, op: PlatformOp, required: LockState) -> Option<TransitionOutcome> {
        let mut inner = self.lock_inner();
        if let Some(current) = inner.in_flight {
            debug!("Ignoring {op:?} while {current:?} is in flight");
            return Some(TransitionOutcome::Ignored(IgnoreReason::InFlight));
        }
        let state = inner.session.state();
        if state != required {
            debug!("Ignoring {op:?} from state {state}");
            return Some(TransitionOutcome::Ignored(IgnoreReason::NotApplicable(
                state,
            )));
        }
        inner.in_flight = Some(op);
        None
    }

    fn finish(&self, next: Option<LockState>) -> Option<StateChange> {
        let mut inner = self.lock_inner();
        inner.in_flight = None;
        next.map(|next| self.commit(&mut inner, next))
    }

    fn commit(&self, inner: &mut ControllerState, next: LockState) -> StateChange {
        let previous = inner.session.transition(next);
        debug!("Lock state {previous} -> {next}");

        let intercept = inner.session.home_intercept_enabled();
        match (intercept, inner.back_subscription) {
            (true, None) => {
                let subscription = self.back_events.subscribe(self.back_handler.clone());
                inner.back_subscription = Some(subscription);
            }
            (false, Some(subscription)) => {
                self.back_events.unsubscribe(subscription);
                inner.back_subscription = None;
            }
            _ => {}
        }

        (previous, next)
    }

    fn notify(&self, (previous, current): StateChange) {
        let observers: Vec<Arc<dyn LockStateObserver>> = self
            .lock_observers()
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect();
        for observer in observers {
            observer.on_state_changed(previous, current);
        }
    }

    /// Puts the confirmation back on screen after the navigation notice is
    /// acknowledged, so a pending lock can still be confirmed or cancelled.
    fn resume_confirmation(&self) {
        let pending = {
            let inner = self.lock_inner();
            inner.in_flight.is_none()
                && inner.session.state() == LockState::PendingConfirmation
        };
        if pending {
            debug!("Restoring lock confirmation after navigation notice");
            self.bridge.show(self.confirmation_state());
        }
    }

    fn confirmation_state(&self) -> AlertState {
        let settings = &self.settings;
        let toggle = Affordance::toggle(settings.toggle_label.clone(), false).on_change({
            let confirm = self.callback(|controller| {
                if let Err(err) = controller.confirm_lock() {
                    debug!("Lock from toggle failed: {err}");
                }
            });
            move |on| {
                if on {
                    confirm();
                }
            }
        });

        AlertState::confirmation(
            settings.confirm_title.clone(),
            settings.confirm_message.clone(),
        )
        .with_affordance(toggle)
        .with_action(
            AlertAction::cancel(settings.cancel_label.clone()).on_invoke(self.callback(
                |controller| {
                    controller.cancel_lock();
                },
            )),
        )
        .with_action(
            AlertAction::default_action(settings.confirm_label.clone()).on_invoke(
                self.callback(|controller| {
                    if let Err(err) = controller.confirm_lock() {
                        debug!("Lock from confirmation failed: {err}");
                    }
                }),
            ),
        )
    }

    fn report_failure(&self, err: &KioskError, op: PlatformOp) {
        let settings = &self.settings;
        let message = ErrorContext::new(err).alert_message();

        let (title, dismiss, retry) = match op {
            PlatformOp::Lock => (
                settings.lock_failed_title.clone(),
                AlertAction::cancel(settings.cancel_label.clone()).on_invoke(self.callback(
                    |controller| {
                        controller.cancel_lock();
                    },
                )),
                AlertAction::default_action(settings.retry_label.clone()).on_invoke(
                    self.callback(|controller| {
                        if let Err(err) = controller.confirm_lock() {
                            debug!("Lock retry failed: {err}");
                        }
                    }),
                ),
            ),
            PlatformOp::Unlock => (
                settings.unlock_failed_title.clone(),
                AlertAction::cancel(settings.stay_locked_label.clone()),
                AlertAction::default_action(settings.retry_label.clone()).on_invoke(
                    self.callback(|controller| {
                        if let Err(err) = controller.unlock() {
                            debug!("Unlock retry failed: {err}");
                        }
                    }),
                ),
            ),
        };

        self.bridge.show_error(title, message, vec![dismiss, retry]);
    }

    /// Wraps `f` so modal callbacks do not keep the controller alive.
    fn callback<F>(&self, f: F) -> impl Fn() + Send + Sync + 'static
    where
        F: Fn(&LockController) + Send + Sync + 'static,
    {
        let me = self.me.clone();
        move || {
            if let Some(controller) = me.upgrade() {
                f(controller.as_ref());
            }
        }
    }

    fn lock_inner(&self) -> MutexGuard<'_, ControllerState> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_observers(&self) -> MutexGuard<'_, Vec<(ObserverId, Arc<dyn LockStateObserver>)>> {
        self.observers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for LockController {
    fn drop(&mut self) {
        let subscription = self.lock_inner().back_subscription.take();
        if let Some(subscription) = subscription {
            self.back_events.unsubscribe(subscription);
        }
    }
}
