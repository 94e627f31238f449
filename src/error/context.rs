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

use crate::error::KioskError;
use std::fmt;

pub struct ErrorContext<'a> {
    pub error: &'a KioskError,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl<'a> ErrorContext<'a> {
    pub fn new(error: &'a KioskError) -> Self {
        let (suggestion, details) = match error {
            KioskError::PlatformLockFailure(reason) => {
                let suggestion = Some(
                    "Kiosk mode is still off. Retry to lock the device again, or cancel to keep \
                     it unlocked."
                        .to_string(),
                );
                let details = Some(format!("The device was not locked: {reason}"));
                (suggestion, details)
            }
            KioskError::PlatformUnlockFailure(reason) => {
                let suggestion = Some(
                    "Kiosk mode is still active and navigation stays disabled. Retry the unlock \
                     once the device management service is reachable."
                        .to_string(),
                );
                let details = Some(format!("The device is still locked: {reason}"));
                (suggestion, details)
            }
            KioskError::ConfigError(msg) | KioskError::InvalidConfig(msg) => {
                let suggestion = Some(
                    "Check config.toml in the kiosk home directory, or delete it to restore the \
                     defaults."
                        .to_string(),
                );
                let details = Some(msg.clone());
                (suggestion, details)
            }
            KioskError::UnknownCommand(command) => {
                let suggestion = Some("Type 'help' to list the available commands.".to_string());
                let details = Some(format!("'{command}' is not a shell command."));
                (suggestion, details)
            }
            _ => (None, None),
        };

        ErrorContext {
            error,
            suggestion,
            details,
        }
    }

    /// Body text for an error alert: details first, then the suggested next step.
    pub fn alert_message(&self) -> String {
        let mut parts = Vec::new();
        if let Some(details) = &self.details {
            parts.push(details.clone());
        }
        if let Some(suggestion) = &self.suggestion {
            parts.push(suggestion.clone());
        }
        if parts.is_empty() {
            return self.error.to_string();
        }
        parts.join("\n\n")
    }
}

impl<'a> fmt::Display for ErrorContext<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\n\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}
