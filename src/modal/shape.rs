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

use crate::alert::{ActionRole, Affordance, AlertKind, AlertState};
use serde::Serialize;

/// The closed set of layouts a modal host can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "shape", content = "kind")]
pub enum ModalShape {
    /// Icon, title, message and buttons. Used for the plain status kinds.
    Notice(AlertKind),
    /// Question layout with an optional toggle.
    Confirmation,
    /// Full-screen blocking layout for SIM card violations.
    SimViolation,
}

impl ModalShape {
    pub fn for_kind(kind: AlertKind) -> Self {
        match kind {
            AlertKind::Confirmation => Self::Confirmation,
            AlertKind::SimCardViolation => Self::SimViolation,
            other => Self::Notice(other),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Notice(AlertKind::Success) => "✔",
            Self::Notice(AlertKind::Warning) => "⚠",
            Self::Notice(AlertKind::Error) => "✖",
            Self::Notice(_) => "ℹ",
            Self::Confirmation => "?",
            Self::SimViolation => "⛔",
        }
    }

    /// Whether tapping outside the modal may dismiss it.
    pub fn dismissable(&self) -> bool {
        !matches!(self, Self::SimViolation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonView {
    pub index: usize,
    pub label: String,
    pub role: ActionRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleView {
    pub label: String,
    pub on: bool,
}

/// Render-ready description of the visible modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalView {
    pub shape: ModalShape,
    pub title: String,
    pub message: String,
    pub buttons: Vec<ButtonView>,
    pub toggle: Option<ToggleView>,
}

impl ModalView {
    pub fn render(state: &AlertState) -> Self {
        let buttons = state
            .actions()
            .iter()
            .enumerate()
            .map(|(index, action)| ButtonView {
                index,
                label: action.label.clone(),
                role: action.role,
            })
            .collect();

        let toggle = state.affordance.as_ref().map(|affordance| match affordance {
            Affordance::Toggle { label, on, .. } => ToggleView {
                label: label.clone(),
                on: *on,
            },
        });

        Self {
            shape: ModalShape::for_kind(state.kind),
            title: state.title.clone(),
            message: state.message.clone(),
            buttons,
            toggle,
        }
    }
}
