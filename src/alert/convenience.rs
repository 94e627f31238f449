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

//! Shorthand constructors screens use instead of building [`AlertState`] by hand.

use crate::alert::bridge::{AlertBridge, Presentation};
use crate::alert::state::{ActionCallback, AlertAction, AlertKind, AlertState};

pub const CONFIRM_LABEL: &str = "Confirm";
pub const CANCEL_LABEL: &str = "Cancel";

impl AlertBridge {
    pub fn show_alert(&self, state: AlertState) -> Presentation {
        self.show(state)
    }

    pub fn hide_alert(&self) {
        self.hide();
    }

    pub fn show_success(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
        actions: Vec<AlertAction>,
    ) -> Presentation {
        self.show_kind(AlertKind::Success, title, message, actions)
    }

    pub fn show_error(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
        actions: Vec<AlertAction>,
    ) -> Presentation {
        self.show_kind(AlertKind::Error, title, message, actions)
    }

    pub fn show_warning(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
        actions: Vec<AlertAction>,
    ) -> Presentation {
        self.show_kind(AlertKind::Warning, title, message, actions)
    }

    pub fn show_info(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
        actions: Vec<AlertAction>,
    ) -> Presentation {
        self.show_kind(AlertKind::Info, title, message, actions)
    }

    /// Two-button confirmation: cancel first, confirm second.
    pub fn show_confirm<F>(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
        on_confirm: F,
        on_cancel: Option<ActionCallback>,
    ) -> Presentation
    where
        F: Fn() + Send + Sync + 'static,
    {
        let state = AlertState::confirmation(title, message)
            .with_action(AlertAction::cancel(CANCEL_LABEL).with_callback(on_cancel))
            .with_action(AlertAction::default_action(CONFIRM_LABEL).on_invoke(on_confirm));
        self.show(state)
    }

    fn show_kind(
        &self,
        kind: AlertKind,
        title: impl Into<String>,
        message: impl Into<String>,
        actions: Vec<AlertAction>,
    ) -> Presentation {
        self.show(AlertState::new(kind, title, message).with_actions(actions))
    }
}
