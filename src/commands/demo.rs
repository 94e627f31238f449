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

use crate::alert::{AlertState, LogDialog};
use crate::app::KioskApp;
use crate::config::KioskConfig;
use crate::error::Result;
use crate::kiosk::{LockController, SimulatedLockTask};
use crate::terminal::{SharedOutput, TerminalPresenter, stdout_output, write_text};
use colored::Colorize;
use std::sync::Arc;

const DEMO_BASELINE_SIM: &str = "89014103211118510720";
const DEMO_SWAPPED_SIM: &str = "89441000303011223344";

/// Walks through the kiosk lock lifecycle and the alert bridge fallbacks.
pub struct DemoCommand<'a> {
    config: &'a KioskConfig,
}

impl<'a> DemoCommand<'a> {
    pub fn new(config: &'a KioskConfig) -> Result<Self> {
        Ok(Self { config })
    }

    pub fn execute(&self) -> Result<()> {
        self.run(stdout_output())
    }

    pub fn run(&self, output: SharedOutput) -> Result<()> {
        let platform = Arc::new(SimulatedLockTask::new());
        let presenter = Arc::new(TerminalPresenter::new(output.clone()));
        let mut app = KioskApp::new(
            self.config,
            platform.clone(),
            presenter,
            Arc::new(LogDialog::new()),
            Some(DEMO_BASELINE_SIM.to_string()),
        );
        let controller = app.controller().clone();

        let step = |title: &str| {
            write_text(&output, &format!("\n{}", format!("==> {title}").bold()));
        };
        let status = |controller: &LockController| {
            write_text(
                &output,
                &format!(
                    "state: {}, back intercepted: {}",
                    controller.state(),
                    controller.home_intercept_enabled()
                ),
            )
        };

        step("Request kiosk mode");
        controller.request_lock();
        status(&controller);

        step("Platform rejects the lock");
        platform.fail_next_lock();
        if let Err(err) = controller.confirm_lock() {
            write_text(&output, &format!("lock failed: {err}"));
        }
        status(&controller);

        step("Confirm again");
        controller.confirm_lock()?;
        status(&controller);

        step("Press back while locked");
        let disposition = app.back().press();
        write_text(&output, &format!("back press: {disposition:?}"));
        status(&controller);

        step("Unlock");
        controller.unlock()?;
        status(&controller);

        step("SIM card swapped");
        let sim_status = app.sim().check(Some(DEMO_SWAPPED_SIM));
        write_text(&output, &format!("sim: {sim_status:?}"));

        step("Alert with no modal host mounted");
        app.unmount();
        let presentation = app
            .bridge()
            .show(AlertState::warning("Offline", "Orders will sync when you reconnect."));
        write_text(&output, &format!("presented via: {presentation:?}"));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::fixtures::Capture;

    #[test]
    fn demo_walks_full_lifecycle() {
        let capture = Capture::default();
        let config = KioskConfig::default();

        DemoCommand::new(&config).unwrap().run(capture.output()).unwrap();

        let text = capture.text();
        assert!(text.contains("state: pending confirmation, back intercepted: true"));
        assert!(text.contains("lock failed: Failed to enter kiosk mode"));
        assert!(text.contains("state: locked, back intercepted: true"));
        assert!(text.contains("back press: Consumed"));
        assert!(text.contains("state: unlocked, back intercepted: false"));
        assert!(text.contains("SIM Card Violation"));
        assert!(text.contains("presented via: Fallback"));
    }
}
