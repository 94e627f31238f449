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

use crate::config::KioskConfig;
use crate::error::Result;
use crate::kiosk::LockSession;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ConfigOutput<'a> {
    home: String,
    config: &'a KioskConfig,
    session: LockSession,
}

pub struct ConfigCommand<'a> {
    config: &'a KioskConfig,
    home: &'a Path,
}

impl<'a> ConfigCommand<'a> {
    pub fn new(config: &'a KioskConfig, home: &'a Path) -> Result<Self> {
        Ok(Self { config, home })
    }

    pub fn execute(&self, json: bool) -> Result<()> {
        println!("{}", self.render(json)?);
        Ok(())
    }

    pub fn render(&self, json: bool) -> Result<String> {
        if json {
            let output = ConfigOutput {
                home: self.home.display().to_string(),
                config: self.config,
                session: LockSession::new(),
            };
            return Ok(serde_json::to_string_pretty(&output)?);
        }

        Ok(format!(
            "# kiosk home: {}\n{}",
            self.home.display(),
            self.config.to_toml()?
        ))
    }
}
