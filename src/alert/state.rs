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

//! Value objects describing a pending alert or modal request.

use crate::config::SimViolationSettings;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Callback run when the user presses an action button.
pub type ActionCallback = Arc<dyn Fn() + Send + Sync>;

/// Callback run when the user flips a toggle affordance; receives the new value.
pub type ToggleCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Label of the button synthesized for alerts declared without actions.
pub const IMPLICIT_ACTION_LABEL: &str = "OK";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Info,
    Success,
    Warning,
    Error,
    Confirmation,
    SimCardViolation,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Confirmation => write!(f, "confirmation"),
            Self::SimCardViolation => write!(f, "sim-card-violation"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionRole {
    Default,
    Cancel,
    Destructive,
}

/// A button on an alert.
#[derive(Clone)]
pub struct AlertAction {
    pub label: String,
    pub role: ActionRole,
    on_invoke: Option<ActionCallback>,
    dismisses: bool,
}

impl AlertAction {
    pub fn new(label: impl Into<String>, role: ActionRole) -> Self {
        Self {
            label: label.into(),
            role,
            on_invoke: None,
            dismisses: true,
        }
    }

    pub fn default_action(label: impl Into<String>) -> Self {
        Self::new(label, ActionRole::Default)
    }

    pub fn cancel(label: impl Into<String>) -> Self {
        Self::new(label, ActionRole::Cancel)
    }

    pub fn destructive(label: impl Into<String>) -> Self {
        Self::new(label, ActionRole::Destructive)
    }

    pub fn on_invoke<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_invoke = Some(Arc::new(callback));
        self
    }

    pub fn with_callback(mut self, callback: Option<ActionCallback>) -> Self {
        self.on_invoke = callback;
        self
    }

    /// Keeps the modal on screen after the action runs.
    pub fn keep_open(mut self) -> Self {
        self.dismisses = false;
        self
    }

    pub fn dismisses(&self) -> bool {
        self.dismisses
    }

    pub fn has_callback(&self) -> bool {
        self.on_invoke.is_some()
    }

    pub fn invoke(&self) {
        if let Some(callback) = &self.on_invoke {
            callback();
        }
    }
}

impl fmt::Debug for AlertAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertAction")
            .field("label", &self.label)
            .field("role", &self.role)
            .field("has_callback", &self.on_invoke.is_some())
            .field("dismisses", &self.dismisses)
            .finish()
    }
}

/// Extra interactive control rendered beside the message.
#[derive(Clone)]
pub enum Affordance {
    Toggle {
        label: String,
        on: bool,
        on_change: Option<ToggleCallback>,
    },
}

impl Affordance {
    pub fn toggle(label: impl Into<String>, on: bool) -> Self {
        Self::Toggle {
            label: label.into(),
            on,
            on_change: None,
        }
    }

    pub fn on_change<F>(self, callback: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        match self {
            Self::Toggle { label, on, .. } => Self::Toggle {
                label,
                on,
                on_change: Some(Arc::new(callback)),
            },
        }
    }
}

impl fmt::Debug for Affordance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toggle {
                label,
                on,
                on_change,
            } => f
                .debug_struct("Toggle")
                .field("label", label)
                .field("on", on)
                .field("has_callback", &on_change.is_some())
                .finish(),
        }
    }
}

/// A request to show one modal.
#[derive(Debug, Clone)]
pub struct AlertState {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    actions: Vec<AlertAction>,
    pub affordance: Option<Affordance>,
}

impl AlertState {
    pub fn new(kind: AlertKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            actions: Vec::new(),
            affordance: None,
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(AlertKind::Info, title, message)
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(AlertKind::Success, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(AlertKind::Warning, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(AlertKind::Error, title, message)
    }

    pub fn confirmation(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(AlertKind::Confirmation, title, message)
    }

    pub fn with_action(mut self, action: AlertAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_actions(mut self, actions: impl IntoIterator<Item = AlertAction>) -> Self {
        self.actions.extend(actions);
        self
    }

    pub fn with_affordance(mut self, affordance: Affordance) -> Self {
        self.affordance = Some(affordance);
        self
    }

    /// Declared actions. Empty until [`AlertState::normalized`] synthesizes the implicit one.
    pub fn actions(&self) -> &[AlertAction] {
        &self.actions
    }

    /// Guarantees at least one button by adding an implicit "OK".
    pub fn normalized(mut self) -> Self {
        if self.actions.is_empty() {
            self.actions
                .push(AlertAction::default_action(IMPLICIT_ACTION_LABEL));
        }
        self
    }
}

/// Caller overrides for the SIM card violation modal. Every field is optional.
#[derive(Clone, Default)]
pub struct SimViolationOptions {
    pub title: Option<String>,
    pub message: Option<String>,
    pub on_payment: Option<ActionCallback>,
    pub on_close: Option<ActionCallback>,
}

impl SimViolationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
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

    /// Builds the alert. Both the payment and the acknowledge buttons are always present.
    pub fn into_state(self, defaults: &SimViolationSettings) -> AlertState {
        let pay = AlertAction::default_action(defaults.pay_label.clone())
            .with_callback(self.on_payment);
        let acknowledge = AlertAction::cancel(defaults.acknowledge_label.clone())
            .with_callback(self.on_close);

        AlertState::new(
            AlertKind::SimCardViolation,
            self.title.unwrap_or_else(|| defaults.title.clone()),
            self.message.unwrap_or_else(|| defaults.message.clone()),
        )
        .with_actions([pay, acknowledge])
    }
}

impl fmt::Debug for SimViolationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimViolationOptions")
            .field("title", &self.title)
            .field("message", &self.message)
            .field("on_payment", &self.on_payment.is_some())
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn empty_actions_synthesize_ok() {
        let state = AlertState::info("Saved", "Profile updated").normalized();
        assert_eq!(state.actions().len(), 1);
        assert_eq!(state.actions()[0].label, IMPLICIT_ACTION_LABEL);
        assert_eq!(state.actions()[0].role, ActionRole::Default);
        assert!(!state.actions()[0].has_callback());
    }

    #[test]
    fn declared_actions_are_kept_in_order() {
        let state = AlertState::confirmation("Delete", "Remove this address?")
            .with_action(AlertAction::cancel("Keep"))
            .with_action(AlertAction::destructive("Delete"))
            .normalized();
        let labels: Vec<_> = state.actions().iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["Keep", "Delete"]);
    }

    #[test]
    fn invoke_runs_callback() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let action = AlertAction::default_action("Go").on_invoke(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        action.invoke();
        action.invoke();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn keep_open_opts_out_of_dismissal() {
        assert!(AlertAction::default_action("Close").dismisses());
        assert!(!AlertAction::default_action("Refresh").keep_open().dismisses());
    }

    #[test]
    fn sim_violation_defaults() {
        let state = SimViolationOptions::new().into_state(&SimViolationSettings::default());
        assert_eq!(state.kind, AlertKind::SimCardViolation);
        assert!(state.title.contains("SIM"));
        let labels: Vec<_> = state.actions().iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["Pay", "Acknowledge"]);
    }

    #[test]
    fn sim_violation_overrides_keep_mandatory_actions() {
        let state = SimViolationOptions::new()
            .title("Unregistered SIM")
            .message("Contact support")
            .on_payment(|| {})
            .into_state(&SimViolationSettings::default());
        assert_eq!(state.title, "Unregistered SIM");
        assert_eq!(state.message, "Contact support");
        assert_eq!(state.actions().len(), 2);
        assert!(state.actions()[0].has_callback());
        assert!(!state.actions()[1].has_callback());
    }

    #[test]
    fn kind_display() {
        assert_eq!(AlertKind::SimCardViolation.to_string(), "sim-card-violation");
        assert_eq!(AlertKind::Confirmation.to_string(), "confirmation");
    }
}
