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

//! Process-wide access point for presenting alerts without a view-tree reference.
//!
//! The bridge holds at most one [`ModalSink`] binding. Requests go to the bound
//! sink when there is one, otherwise to the [`FallbackDialog`] so that an alert
//! is never silently dropped.

use crate::alert::fallback::{FallbackButton, FallbackDialog, LogDialog, reduce_actions};
use crate::alert::state::{AlertState, SimViolationOptions};
use crate::config::{
    FallbackSettings, KioskConfig, MAX_FALLBACK_BUTTONS_LIMIT, SimViolationSettings,
};
use log::{debug, warn};
use std::ptr;
use std::sync::{Arc, Mutex, MutexGuard};

/// The callback set a mounted modal host exposes to the bridge.
pub trait ModalSink: Send + Sync {
    fn show_alert(&self, state: AlertState);

    fn hide_alert(&self);

    fn show_sim_card_violation(&self, state: AlertState) {
        self.show_alert(state);
    }
}

/// Which tier ended up presenting a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    Primary,
    Fallback,
}

pub struct AlertBridge {
    binding: Mutex<Option<Arc<dyn ModalSink>>>,
    fallback: Arc<dyn FallbackDialog>,
    max_fallback_buttons: usize,
    sim_defaults: SimViolationSettings,
}

impl AlertBridge {
    pub fn new(fallback: Arc<dyn FallbackDialog>) -> Self {
        Self {
            binding: Mutex::new(None),
            fallback,
            max_fallback_buttons: FallbackSettings::default().max_buttons,
            sim_defaults: SimViolationSettings::default(),
        }
    }

    pub fn with_log_fallback() -> Self {
        Self::new(Arc::new(LogDialog::new()))
    }

    pub fn from_config(config: &KioskConfig, fallback: Arc<dyn FallbackDialog>) -> Self {
        Self::new(fallback)
            .with_max_fallback_buttons(config.fallback.max_buttons)
            .with_sim_defaults(config.sim_violation.clone())
    }

    pub fn with_max_fallback_buttons(mut self, max: usize) -> Self {
        self.max_fallback_buttons = max.clamp(1, MAX_FALLBACK_BUTTONS_LIMIT);
        self
    }

    pub fn with_sim_defaults(mut self, defaults: SimViolationSettings) -> Self {
        self.sim_defaults = defaults;
        self
    }

    pub fn sim_defaults(&self) -> &SimViolationSettings {
        &self.sim_defaults
    }

    /// Installs `sink` as the active binding, replacing any previous one.
    pub fn bind(&self, sink: Arc<dyn ModalSink>) {
        let mut binding = self.binding();
        if binding.is_some() {
            debug!("Replacing existing modal binding");
        }
        *binding = Some(sink);
    }

    /// Clears the binding only when `sink` is the one installed.
    ///
    /// Returns `false` for a stale unbind, which leaves the newer binding in place.
    pub fn unbind(&self, sink: &Arc<dyn ModalSink>) -> bool {
        let mut binding = self.binding();
        match binding.as_ref() {
            Some(current) if same_sink(current, sink) => {
                *binding = None;
                debug!("Modal binding cleared");
                true
            }
            Some(_) => {
                debug!("Ignoring unbind from a host that is no longer bound");
                false
            }
            None => false,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.binding().is_some()
    }

    pub fn is_bound_to(&self, sink: &Arc<dyn ModalSink>) -> bool {
        self.binding()
            .as_ref()
            .is_some_and(|current| same_sink(current, sink))
    }

    pub fn show(&self, state: AlertState) -> Presentation {
        match self.current_sink() {
            Some(sink) => {
                debug!("Dispatching {} alert '{}'", state.kind, state.title);
                sink.show_alert(state);
                Presentation::Primary
            }
            None => self.present_fallback(state),
        }
    }

    /// Shows the SIM card violation modal. Defaults fill in anything `options` leaves out.
    pub fn show_sim_card_violation(&self, options: SimViolationOptions) -> Presentation {
        let state = options.into_state(&self.sim_defaults);
        match self.current_sink() {
            Some(sink) => {
                debug!("Dispatching SIM card violation '{}'", state.title);
                sink.show_sim_card_violation(state);
                Presentation::Primary
            }
            None => self.present_fallback(state),
        }
    }

    pub fn hide(&self) {
        if let Some(sink) = self.current_sink() {
            sink.hide_alert();
        }
    }

    fn present_fallback(&self, state: AlertState) -> Presentation {
        warn!(
            "No modal host bound; presenting '{}' through the fallback dialog",
            state.title
        );

        let state = state.normalized();
        let kept = reduce_actions(state.actions(), self.max_fallback_buttons);
        let buttons: Vec<FallbackButton> = kept
            .iter()
            .map(|&index| {
                let action = &state.actions()[index];
                FallbackButton {
                    label: action.label.clone(),
                    role: action.role,
                }
            })
            .collect();

        let choice = self
            .fallback
            .present(state.kind, &state.title, &state.message, &buttons);

        if let Some(action) = choice
            .and_then(|pressed| kept.get(pressed))
            .and_then(|&index| state.actions().get(index))
        {
            debug!("Fallback dialog answered with '{}'", action.label);
            action.invoke();
        }

        Presentation::Fallback
    }

    fn current_sink(&self) -> Option<Arc<dyn ModalSink>> {
        self.binding().clone()
    }

    fn binding(&self) -> MutexGuard<'_, Option<Arc<dyn ModalSink>>> {
        // The slot holds a plain Option, so a poisoned guard is still usable.
        self.binding
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for AlertBridge {
    fn default() -> Self {
        Self::with_log_fallback()
    }
}

fn same_sink(a: &Arc<dyn ModalSink>, b: &Arc<dyn ModalSink>) -> bool {
    ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
