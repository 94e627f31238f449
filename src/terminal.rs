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

//! Terminal rendering for the CLI: a modal presenter and a prompt-based fallback dialog.

use crate::alert::{ActionRole, AlertKind, FallbackButton, FallbackDialog};
use crate::modal::{ModalPresenter, ModalShape, ModalView};
use colored::{ColoredString, Colorize};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};

pub type SharedInput = Arc<Mutex<Box<dyn BufRead + Send>>>;
pub type SharedOutput = Arc<Mutex<Box<dyn Write + Send>>>;

pub fn stdin_input() -> SharedInput {
    Arc::new(Mutex::new(Box::new(io::BufReader::new(io::stdin()))))
}

pub fn stdout_output() -> SharedOutput {
    Arc::new(Mutex::new(Box::new(io::stdout())))
}

/// Reads one line from `input`. `None` at end of input.
pub fn read_line(input: &SharedInput) -> io::Result<Option<String>> {
    let mut line = String::new();
    let read = match input.lock() {
        Ok(mut reader) => reader.read_line(&mut line)?,
        Err(poisoned) => poisoned.into_inner().read_line(&mut line)?,
    };
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

pub fn write_text(output: &SharedOutput, text: &str) {
    if let Ok(mut out) = output.lock() {
        let _ = writeln!(out, "{text}");
        let _ = out.flush();
    }
}

fn tint(text: &str, shape: ModalShape) -> ColoredString {
    match shape {
        ModalShape::Notice(AlertKind::Success) => text.green().bold(),
        ModalShape::Notice(AlertKind::Warning) => text.yellow().bold(),
        ModalShape::Notice(AlertKind::Error) | ModalShape::SimViolation => text.red().bold(),
        ModalShape::Confirmation => text.cyan().bold(),
        ModalShape::Notice(_) => text.blue().bold(),
    }
}

fn button_label(label: &str, role: ActionRole) -> String {
    match role {
        ActionRole::Default => label.to_string(),
        ActionRole::Cancel => label.dimmed().to_string(),
        ActionRole::Destructive => label.red().to_string(),
    }
}

/// Draws a modal as a boxed table. Buttons are numbered from 1.
pub fn render_view(view: &ModalView) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![Cell::new(
        tint(&format!("{} {}", view.shape.icon(), view.title), view.shape).to_string(),
    )]);

    table.add_row(vec![Cell::new(&view.message)]);

    if let Some(toggle) = &view.toggle {
        let mark = if toggle.on { "[x]" } else { "[ ]" };
        table.add_row(vec![Cell::new(format!("{mark} {} (toggle)", toggle.label))]);
    }

    let buttons = view
        .buttons
        .iter()
        .map(|button| {
            let label = button_label(&button.label, button.role);
            format!("[{}] {label}", button.index + 1)
        })
        .collect::<Vec<_>>()
        .join("   ");
    table.add_row(vec![Cell::new(buttons)]);

    table.to_string()
}

pub struct TerminalPresenter {
    output: SharedOutput,
}

impl TerminalPresenter {
    pub fn new(output: SharedOutput) -> Self {
        Self { output }
    }
}

impl ModalPresenter for TerminalPresenter {
    fn present(&self, view: &ModalView) {
        write_text(&self.output, &render_view(view));
    }

    fn dismiss(&self) {
        write_text(&self.output, &"(modal dismissed)".dimmed().to_string());
    }
}

/// Blocking fallback dialog that asks for a button number on the terminal.
pub struct PromptDialog {
    input: SharedInput,
    output: SharedOutput,
}

impl PromptDialog {
    pub fn new(input: SharedInput, output: SharedOutput) -> Self {
        Self { input, output }
    }
}

impl FallbackDialog for PromptDialog {
    fn present(
        &self,
        kind: AlertKind,
        title: &str,
        message: &str,
        buttons: &[FallbackButton],
    ) -> Option<usize> {
        let choices = buttons
            .iter()
            .enumerate()
            .map(|(index, button)| format!("[{}] {}", index + 1, button.label))
            .collect::<Vec<_>>()
            .join("  ");
        write_text(
            &self.output,
            &format!(
                "{} {title}\n{message}\n{choices}\nChoose a button:",
                format!("native {kind} dialog:").dimmed()
            ),
        );

        let answer = read_line(&self.input).ok().flatten()?;
        let index = answer.parse::<usize>().ok()?.checked_sub(1)?;
        (index < buttons.len()).then_some(index)
    }
}
