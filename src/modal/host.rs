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

//! The single owner of "which modal is currently shown".
//!
//! A host moves between `Idle` and `Showing`. Requests replace whatever is on
//! screen (last request wins); there is no queue. Every change bumps a
//! generation counter so an action that presents a follow-up modal from its
//! callback is not dismissed by its own completion.

use crate::alert::{Affordance, AlertBridge, AlertKind, AlertState, ModalSink};
use crate::modal::shape::ModalView;
use log::{debug, warn};
use std::sync::{Arc, Mutex, MutexGuard};

/// Draws modal views. The host calls it after every state change.
pub trait ModalPresenter: Send + Sync {
    fn present(&self, view: &ModalView);

    fn dismiss(&self);
}

/// Presenter that draws nothing, for headless hosts.
#[derive(Debug, Default)]
pub struct NoopPresenter;

impl ModalPresenter for NoopPresenter {
    fn present(&self, _view: &ModalView) {}

    fn dismiss(&self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPhase {
    Idle,
    Showing,
}

struct HostState {
    current: Option<AlertState>,
    generation: u64,
}

pub struct ModalHost {
    state: Mutex<HostState>,
    presenter: Arc<dyn ModalPresenter>,
}

impl ModalHost {
    pub fn new(presenter: Arc<dyn ModalPresenter>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(HostState {
                current: None,
                generation: 0,
            }),
            presenter,
        })
    }

    pub fn headless() -> Arc<Self> {
        Self::new(Arc::new(NoopPresenter))
    }

    /// Binds this host to `bridge`. The binding is released when the guard drops.
    pub fn mount(self: &Arc<Self>, bridge: &Arc<AlertBridge>) -> MountedHost {
        let sink: Arc<dyn ModalSink> = self.clone();
        bridge.bind(sink.clone());
        debug!("Modal host mounted");
        MountedHost {
            host: self.clone(),
            sink,
            bridge: bridge.clone(),
            mounted: true,
        }
    }

    /// Replaces whatever is on screen with `state`.
    pub fn show_modal(&self, state: AlertState) {
        let state = state.normalized();
        let view = ModalView::render(&state);
        {
            let mut host = self.lock_state();
            if let Some(previous) = &host.current {
                debug!(
                    "Replacing visible modal '{}' with '{}'",
                    previous.title, state.title
                );
            }
            host.current = Some(state);
            host.generation += 1;
        }
        self.presenter.present(&view);
    }

    pub fn hide_modal(&self) {
        let was_showing = {
            let mut host = self.lock_state();
            host.generation += 1;
            host.current.take().is_some()
        };
        if was_showing {
            self.presenter.dismiss();
        }
    }

    pub fn phase(&self) -> HostPhase {
        if self.is_visible() {
            HostPhase::Showing
        } else {
            HostPhase::Idle
        }
    }

    pub fn is_visible(&self) -> bool {
        self.lock_state().current.is_some()
    }

    pub fn current_kind(&self) -> Option<AlertKind> {
        self.lock_state().current.as_ref().map(|state| state.kind)
    }

    pub fn current_view(&self) -> Option<ModalView> {
        self.lock_state().current.as_ref().map(ModalView::render)
    }

    /// Presses the button at `index` of the visible modal.
    ///
    /// The action's callback runs first; the modal is then dismissed unless the
    /// action opted out or the callback already put another modal on screen.
    /// Returns `false` when nothing is visible or `index` is out of range.
    pub fn invoke(&self, index: usize) -> bool {
        let (action, generation) = {
            let host = self.lock_state();
            let Some(action) = host
                .current
                .as_ref()
                .and_then(|state| state.actions().get(index))
                .cloned()
            else {
                return false;
            };
            (action, host.generation)
        };

        debug!("Invoking modal action '{}'", action.label);
        action.invoke();

        if action.dismisses() {
            let dismissed = {
                let mut host = self.lock_state();
                if host.generation == generation {
                    host.current = None;
                    host.generation += 1;
                    true
                } else {
                    false
                }
            };
            if dismissed {
                self.presenter.dismiss();
            }
        }
        true
    }

    /// Flips the toggle of the visible modal and returns its new value.
    pub fn flip_toggle(&self) -> Option<bool> {
        let (value, callback, view) = {
            let mut host = self.lock_state();
            let state = host.current.as_mut()?;
            let (value, callback) = match state.affordance.as_mut()? {
                Affordance::Toggle { on, on_change, .. } => {
                    *on = !*on;
                    (*on, on_change.clone())
                }
            };
            let view = ModalView::render(state);
            host.generation += 1;
            (value, callback, view)
        };

        self.presenter.present(&view);
        if let Some(callback) = callback {
            callback(value);
        }
        Some(value)
    }

    fn lock_state(&self) -> MutexGuard<'_, HostState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ModalSink for ModalHost {
    fn show_alert(&self, state: AlertState) {
        self.show_modal(state);
    }

    fn hide_alert(&self) {
        self.hide_modal();
    }

    fn show_sim_card_violation(&self, state: AlertState) {
        if state.kind != AlertKind::SimCardViolation {
            warn!("SIM violation requested with kind {}", state.kind);
        }
        self.show_modal(state);
    }
}

/// A host bound to a bridge. Unbinds on drop.
pub struct MountedHost {
    host: Arc<ModalHost>,
    sink: Arc<dyn ModalSink>,
    bridge: Arc<AlertBridge>,
    mounted: bool,
}

impl MountedHost {
    pub fn host(&self) -> &Arc<ModalHost> {
        &self.host
    }

    /// Whether the bridge still routes to this host.
    pub fn is_active(&self) -> bool {
        self.mounted && self.bridge.is_bound_to(&self.sink)
    }

    pub fn unmount(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        if self.bridge.unbind(&self.sink) {
            debug!("Modal host unmounted");
        }
    }
}

impl Drop for MountedHost {
    fn drop(&mut self) {
        self.release();
    }
}
