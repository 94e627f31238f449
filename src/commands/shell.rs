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

//! Interactive session for driving the kiosk bridge by hand.

use crate::app::KioskApp;
use crate::config::KioskConfig;
use crate::error::{KioskError, Result, format_error_chain};
use crate::kiosk::{BackDisposition, LockState, SimulatedLockTask, TransitionOutcome};
use crate::terminal::{
    PromptDialog, SharedInput, SharedOutput, TerminalPresenter, read_line, stdin_input,
    stdout_output, write_text,
};
use log::debug;
use std::sync::Arc;

const HELP: &str = "\
Commands:
  lock                 request kiosk mode (shows the confirmation modal)
  confirm              confirm the pending lock
  cancel               cancel the pending lock
  unlock               leave kiosk mode
  back                 press the hardware back button
  tap <n>              press button <n> of the visible modal
  toggle               flip the toggle of the visible modal
  hide                 dismiss the visible modal
  sim <iccid>|none     report the current SIM card
  unmount              unmount the modal host
  mount                mount a new modal host
  fail-next lock|unlock  make the next platform call fail
  state [--json]       show the lock session
  help                 show this help
  quit                 leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellAction {
    Lock,
    Confirm,
    Cancel,
    Unlock,
    Back,
    Tap(usize),
    Toggle,
    Hide,
    Sim(Option<String>),
    Unmount,
    Mount,
    FailNextLock,
    FailNextUnlock,
    State { json: bool },
    Help,
    Quit,
}

fn parse(line: &str) -> Result<Option<ShellAction>> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let argument = words.next();

    let action = match (command, argument) {
        ("lock", None) => ShellAction::Lock,
        ("confirm", None) => ShellAction::Confirm,
        ("cancel", None) => ShellAction::Cancel,
        ("unlock", None) => ShellAction::Unlock,
        ("back", None) => ShellAction::Back,
        ("tap", Some(n)) => match n.parse::<usize>() {
            Ok(n) if n > 0 => ShellAction::Tap(n - 1),
            _ => return Err(KioskError::UnknownCommand(line.to_string())),
        },
        ("toggle", None) => ShellAction::Toggle,
        ("hide", None) => ShellAction::Hide,
        ("sim", Some("none")) => ShellAction::Sim(None),
        ("sim", Some(iccid)) => ShellAction::Sim(Some(iccid.to_string())),
        ("unmount", None) => ShellAction::Unmount,
        ("mount", None) => ShellAction::Mount,
        ("fail-next", Some("lock")) => ShellAction::FailNextLock,
        ("fail-next", Some("unlock")) => ShellAction::FailNextUnlock,
        ("state", None) => ShellAction::State { json: false },
        ("state", Some("--json")) => ShellAction::State { json: true },
        ("help", None) => ShellAction::Help,
        ("quit" | "exit", None) => ShellAction::Quit,
        _ => return Err(KioskError::UnknownCommand(line.to_string())),
    };
    Ok(Some(action))
}

pub struct ShellCommand<'a> {
    config: &'a KioskConfig,
}

impl<'a> ShellCommand<'a> {
    pub fn new(config: &'a KioskConfig) -> Result<Self> {
        Ok(Self { config })
    }

    pub fn execute(&self, sim_baseline: Option<String>) -> Result<()> {
        self.run(stdin_input(), stdout_output(), sim_baseline)
    }

    pub fn run(
        &self,
        input: SharedInput,
        output: SharedOutput,
        sim_baseline: Option<String>,
    ) -> Result<()> {
        let platform = Arc::new(SimulatedLockTask::new());
        let mut app = KioskApp::new(
            self.config,
            platform.clone(),
            Arc::new(TerminalPresenter::new(output.clone())),
            Arc::new(PromptDialog::new(input.clone(), output.clone())),
            sim_baseline,
        );

        let observer_output = output.clone();
        app.controller()
            .subscribe(Arc::new(move |previous: LockState, current: LockState| {
                write_text(&observer_output, &format!("lock state: {previous} -> {current}"));
            }));

        write_text(&output, "Type 'help' for commands.");
        let session = ShellSession {
            app: &mut app,
            platform: &platform,
            output: &output,
        };
        session.run(&input)
    }
}

struct ShellSession<'s> {
    app: &'s mut KioskApp,
    platform: &'s SimulatedLockTask,
    output: &'s SharedOutput,
}

impl ShellSession<'_> {
    fn run(mut self, input: &SharedInput) -> Result<()> {
        while let Some(line) = read_line(input)? {
            let action = match parse(&line) {
                Ok(Some(action)) => action,
                Ok(None) => continue,
                Err(err) => {
                    self.say(&format_error_chain(&err));
                    continue;
                }
            };
            debug!("Shell action {action:?}");
            if action == ShellAction::Quit {
                break;
            }
            self.apply(action)?;
        }
        Ok(())
    }

    fn apply(&mut self, action: ShellAction) -> Result<()> {
        let controller = self.app.controller().clone();
        match action {
            ShellAction::Lock => self.report(controller.request_lock()),
            ShellAction::Confirm => self.report_result(controller.confirm_lock()),
            ShellAction::Cancel => self.report(controller.cancel_lock()),
            ShellAction::Unlock => self.report_result(controller.unlock()),
            ShellAction::Back => match self.app.back().press() {
                BackDisposition::Consumed => self.say("back press consumed"),
                BackDisposition::Propagate => self.say("navigated back"),
            },
            ShellAction::Tap(index) => {
                if !self.app.host().invoke(index) {
                    self.say("no such button");
                }
            }
            ShellAction::Toggle => {
                if self.app.host().flip_toggle().is_none() {
                    self.say("no toggle on screen");
                }
            }
            ShellAction::Hide => self.app.bridge().hide(),
            ShellAction::Sim(current) => {
                let status = self.app.sim().check(current.as_deref());
                self.say(&format!("sim: {status:?}"));
            }
            ShellAction::Unmount => {
                self.app.unmount();
                self.say("modal host unmounted");
            }
            ShellAction::Mount => {
                self.app.remount();
                self.say("modal host mounted");
            }
            ShellAction::FailNextLock => self.platform.fail_next_lock(),
            ShellAction::FailNextUnlock => self.platform.fail_next_unlock(),
            ShellAction::State { json } => {
                let session = controller.session();
                if json {
                    self.say(&serde_json::to_string_pretty(&session)?);
                } else {
                    self.say(&format!(
                        "state: {}, back intercepted: {}, back handlers: {}, host mounted: {}",
                        session.state(),
                        session.home_intercept_enabled(),
                        self.app.back().handler_count(),
                        self.app.is_mounted()
                    ));
                }
            }
            ShellAction::Help => self.say(HELP),
            ShellAction::Quit => {}
        }
        Ok(())
    }

    fn report(&self, outcome: TransitionOutcome) {
        if let TransitionOutcome::Ignored(reason) = outcome {
            self.say(&format!("ignored: {reason:?}"));
        }
    }

    fn report_result(&self, result: Result<TransitionOutcome>) {
        match result {
            Ok(outcome) => self.report(outcome),
            // The controller already put an error alert on screen.
            Err(err) => debug!("Transition failed: {err}"),
        }
    }

    fn say(&self, text: &str) {
        write_text(self.output, text);
    }
}
