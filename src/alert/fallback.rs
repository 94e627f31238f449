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

//! Second presentation tier used when no modal host is bound.
//!
//! Native dialogs block until the user answers and render only a couple of
//! buttons, so the action list is reduced before it reaches the dialog.

use crate::alert::state::{ActionRole, AlertAction, AlertKind};
use log::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackButton {
    pub label: String,
    pub role: ActionRole,
}

/// A blocking, platform-provided dialog.
pub trait FallbackDialog: Send + Sync {
    /// Shows the dialog and returns the index of the pressed button, or `None`
    /// when the dialog was dismissed without a choice.
    fn present(
        &self,
        kind: AlertKind,
        title: &str,
        message: &str,
        buttons: &[FallbackButton],
    ) -> Option<usize>;
}

/// Non-interactive dialog that writes the alert to stderr.
#[derive(Debug, Default)]
pub struct LogDialog;

impl LogDialog {
    pub fn new() -> Self {
        Self
    }
}

impl FallbackDialog for LogDialog {
    fn present(
        &self,
        kind: AlertKind,
        title: &str,
        message: &str,
        buttons: &[FallbackButton],
    ) -> Option<usize> {
        let labels = buttons
            .iter()
            .map(|b| format!("[{}]", b.label))
            .collect::<Vec<_>>()
            .join(" ");
        warn!("{kind} alert shown without a modal host: {title}");
        eprintln!("{title}\n{message}\n{labels}");
        None
    }
}

/// Picks which actions survive on a dialog with at most `max` buttons.
///
/// Returns indices into `actions` in declaration order. The first cancel
/// action is always kept so the user has a way out; remaining slots go to the
/// other actions in order.
pub fn reduce_actions(actions: &[AlertAction], max: usize) -> Vec<usize> {
    if actions.len() <= max {
        return (0..actions.len()).collect();
    }
    if max == 0 {
        return Vec::new();
    }

    let cancel = actions.iter().position(|a| a.role == ActionRole::Cancel);
    let others = max - usize::from(cancel.is_some());

    let mut kept: Vec<usize> = actions
        .iter()
        .enumerate()
        .filter(|(index, _)| Some(*index) != cancel)
        .map(|(index, _)| index)
        .take(others)
        .collect();
    kept.extend(cancel);
    kept.sort_unstable();
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actions(roles: &[ActionRole]) -> Vec<AlertAction> {
        roles
            .iter()
            .enumerate()
            .map(|(i, role)| AlertAction::new(format!("a{i}"), *role))
            .collect()
    }

    #[test]
    fn short_lists_are_untouched() {
        let list = actions(&[ActionRole::Default, ActionRole::Cancel]);
        assert_eq!(reduce_actions(&list, 2), vec![0, 1]);
    }

    #[test]
    fn cancel_survives_reduction() {
        let list = actions(&[
            ActionRole::Default,
            ActionRole::Destructive,
            ActionRole::Default,
            ActionRole::Cancel,
        ]);
        assert_eq!(reduce_actions(&list, 2), vec![0, 3]);
    }

    #[test]
    fn without_cancel_first_actions_win() {
        let list = actions(&[
            ActionRole::Default,
            ActionRole::Destructive,
            ActionRole::Default,
        ]);
        assert_eq!(reduce_actions(&list, 2), vec![0, 1]);
    }

    #[test]
    fn single_slot_prefers_cancel() {
        let list = actions(&[ActionRole::Default, ActionRole::Cancel, ActionRole::Default]);
        assert_eq!(reduce_actions(&list, 1), vec![1]);
    }

    #[test]
    fn log_dialog_never_chooses() {
        let dialog = LogDialog::new();
        let buttons = vec![FallbackButton {
            label: "OK".to_string(),
            role: ActionRole::Default,
        }];
        assert_eq!(
            dialog.present(AlertKind::Info, "Title", "Body", &buttons),
            None
        );
    }
}
