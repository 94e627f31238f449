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

use crate::error::{KioskError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.toml";
const HOME_ENV_VAR: &str = "TLB_KIOSK_HOME";
const HOME_DIR_NAME: &str = ".tlb-kiosk";
const DEFAULT_MAX_FALLBACK_BUTTONS: usize = 2;
/// Native dialogs on the target platforms show at most two buttons.
pub const MAX_FALLBACK_BUTTONS_LIMIT: usize = 2;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KioskConfig {
    #[serde(default)]
    pub kiosk: KioskSettings,

    #[serde(default)]
    pub sim_violation: SimViolationSettings,

    #[serde(default)]
    pub fallback: FallbackSettings,
}

/// Texts used by the lock controller and the back-press interception.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KioskSettings {
    pub confirm_title: String,
    pub confirm_message: String,
    pub toggle_label: String,
    pub confirm_label: String,
    pub cancel_label: String,
    pub navigation_title: String,
    pub navigation_message: String,
    pub locked_title: String,
    pub locked_message: String,
    pub unlocked_title: String,
    pub unlocked_message: String,
    pub lock_failed_title: String,
    pub unlock_failed_title: String,
    pub retry_label: String,
    pub stay_locked_label: String,
}

impl Default for KioskSettings {
    fn default() -> Self {
        Self {
            confirm_title: "Enable Kiosk Mode".to_string(),
            confirm_message: "The device will be pinned to TLB Diamond and the back and home \
                              gestures will stop working until kiosk mode is turned off."
                .to_string(),
            toggle_label: "Kiosk mode".to_string(),
            confirm_label: "Enable".to_string(),
            cancel_label: "Cancel".to_string(),
            navigation_title: "Navigation Disabled".to_string(),
            navigation_message: "Navigation is disabled in kiosk mode.".to_string(),
            locked_title: "Kiosk Mode Enabled".to_string(),
            locked_message: "The device is now pinned to TLB Diamond.".to_string(),
            unlocked_title: "Kiosk Mode Disabled".to_string(),
            unlocked_message: "Navigation has been restored.".to_string(),
            lock_failed_title: "Kiosk Mode Not Enabled".to_string(),
            unlock_failed_title: "Kiosk Mode Still Active".to_string(),
            retry_label: "Retry".to_string(),
            stay_locked_label: "Stay Locked".to_string(),
        }
    }
}

/// Defaults applied to SIM card violation modals when the caller omits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimViolationSettings {
    pub title: String,
    pub message: String,
    pub pay_label: String,
    pub acknowledge_label: String,
}

impl Default for SimViolationSettings {
    fn default() -> Self {
        Self {
            title: "SIM Card Violation".to_string(),
            message: "The SIM card in this device does not match the one registered to your \
                      account. Settle the outstanding balance to keep using the device."
                .to_string(),
            pay_label: "Pay".to_string(),
            acknowledge_label: "Acknowledge".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackSettings {
    /// Native dialogs only render a handful of buttons; extra actions are dropped.
    #[serde(default = "default_max_buttons")]
    pub max_buttons: usize,
}

impl Default for FallbackSettings {
    fn default() -> Self {
        Self {
            max_buttons: DEFAULT_MAX_FALLBACK_BUTTONS,
        }
    }
}

fn default_max_buttons() -> usize {
    DEFAULT_MAX_FALLBACK_BUTTONS
}

impl KioskConfig {
    pub fn load(home: &Path) -> Result<Self> {
        let config_path = home.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            log::debug!("Config file not found at {config_path:?}, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: KioskConfig = toml::from_str(&contents)
            .map_err(|e| KioskError::ConfigError(format!("Failed to parse config.toml: {e}")))?;
        config.validate()?;

        log::debug!("Loaded config from {config_path:?}");
        Ok(config)
    }

    pub fn save(&self, home: &Path) -> Result<()> {
        let config_path = home.join(CONFIG_FILE_NAME);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = self.to_toml()?;
        fs::write(&config_path, contents)?;
        log::debug!("Saved config to {config_path:?}");
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| KioskError::ConfigError(format!("Failed to serialize config: {e}")))
    }

    pub fn validate(&self) -> Result<()> {
        let max = self.fallback.max_buttons;
        if max == 0 || max > MAX_FALLBACK_BUTTONS_LIMIT {
            return Err(KioskError::InvalidConfig(format!(
                "fallback.max_buttons must be between 1 and {MAX_FALLBACK_BUTTONS_LIMIT}, got {max}"
            )));
        }
        Ok(())
    }
}

/// Resolves the kiosk home directory: explicit override, then `TLB_KIOSK_HOME`,
/// then `~/.tlb-kiosk`.
pub fn resolve_home(override_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path.to_path_buf());
    }

    if let Ok(value) = env::var(HOME_ENV_VAR)
        && !value.trim().is_empty()
    {
        return Ok(PathBuf::from(value));
    }

    dirs::home_dir()
        .map(|home| home.join(HOME_DIR_NAME))
        .ok_or_else(|| {
            KioskError::ConfigError(format!(
                "Unable to determine the home directory; set {HOME_ENV_VAR}"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = KioskConfig::default();
        assert_eq!(config.fallback.max_buttons, DEFAULT_MAX_FALLBACK_BUTTONS);
        assert!(config.sim_violation.title.contains("SIM"));
        assert_eq!(config.sim_violation.pay_label, "Pay");
        assert_eq!(config.sim_violation.acknowledge_label, "Acknowledge");
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = KioskConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config.kiosk, KioskSettings::default());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();

        let mut config = KioskConfig::default();
        config.fallback.max_buttons = 1;
        config.kiosk.navigation_message = "Ask staff for help.".to_string();

        config.save(temp_dir.path()).unwrap();

        let loaded = KioskConfig::load(temp_dir.path()).unwrap();
        assert_eq!(loaded.fallback.max_buttons, 1);
        assert_eq!(loaded.kiosk.navigation_message, "Ask staff for help.");
    }

    #[test]
    fn test_partial_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);

        fs::write(
            &config_path,
            r#"
[sim_violation]
title = "SIM mismatch"
"#,
        )
        .unwrap();

        let loaded = KioskConfig::load(temp_dir.path()).unwrap();
        assert_eq!(loaded.sim_violation.title, "SIM mismatch");
        assert_eq!(loaded.sim_violation.pay_label, "Pay");
        assert_eq!(loaded.fallback.max_buttons, DEFAULT_MAX_FALLBACK_BUTTONS);
    }

    #[test]
    fn test_invalid_max_buttons_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[fallback]\nmax_buttons = 0\n").unwrap();

        let err = KioskConfig::load(temp_dir.path()).unwrap_err();
        assert!(matches!(err, KioskError::InvalidConfig(_)));
    }

    #[test]
    fn test_more_than_two_fallback_buttons_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[fallback]\nmax_buttons = 3\n").unwrap();

        let err = KioskConfig::load(temp_dir.path()).unwrap_err();
        assert!(
            matches!(err, KioskError::InvalidConfig(ref msg) if msg.contains("between 1 and 2"))
        );
    }

    #[test]
    fn test_malformed_config_reports_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[kiosk\n").unwrap();

        let err = KioskConfig::load(temp_dir.path()).unwrap_err();
        assert!(matches!(err, KioskError::ConfigError(_)));
    }

    #[test]
    fn test_resolve_home_prefers_override() {
        let temp_dir = TempDir::new().unwrap();
        let resolved = resolve_home(Some(temp_dir.path())).unwrap();
        assert_eq!(resolved, temp_dir.path());
    }

    #[test]
    #[serial]
    fn test_resolve_home_from_env() {
        let temp_dir = TempDir::new().unwrap();
        let previous = env::var(HOME_ENV_VAR).ok();
        unsafe {
            env::set_var(HOME_ENV_VAR, temp_dir.path());
        }

        let resolved = resolve_home(None).unwrap();

        match previous {
            Some(value) => unsafe { env::set_var(HOME_ENV_VAR, value) },
            None => unsafe { env::remove_var(HOME_ENV_VAR) },
        }
        assert_eq!(resolved, temp_dir.path());
    }
}
