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

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tlb_kiosk::alert::{AlertKind, FallbackButton, FallbackDialog};
use tlb_kiosk::error::{KioskError, Result};
use tlb_kiosk::kiosk::PlatformLock;
use tlb_kiosk::modal::{ModalPresenter, ModalView};

/// Presenter that keeps every view it was asked to draw.
#[derive(Default)]
pub struct RecordingPresenter {
    pub views: Mutex<Vec<ModalView>>,
    pub dismissals: AtomicUsize,
}

impl RecordingPresenter {
    pub fn titles(&self) -> Vec<String> {
        self.views
            .lock()
            .unwrap()
            .iter()
            .map(|view| view.title.clone())
            .collect()
    }

    pub fn dismissals(&self) -> usize {
        self.dismissals.load(Ordering::SeqCst)
    }
}

impl ModalPresenter for RecordingPresenter {
    fn present(&self, view: &ModalView) {
        self.views.lock().unwrap().push(view.clone());
    }

    fn dismiss(&self) {
        self.dismissals.fetch_add(1, Ordering::SeqCst);
    }
}

/// Fallback dialog that records what it was shown and answers with a fixed choice.
#[derive(Default)]
pub struct RecordingDialog {
    pub answer: Option<usize>,
    pub shown: Mutex<Vec<(AlertKind, String, Vec<FallbackButton>)>>,
}

impl RecordingDialog {
    pub fn answering(answer: usize) -> Self {
        Self {
            answer: Some(answer),
            shown: Mutex::new(Vec::new()),
        }
    }

    pub fn count(&self) -> usize {
        self.shown.lock().unwrap().len()
    }
}

impl FallbackDialog for RecordingDialog {
    fn present(
        &self,
        kind: AlertKind,
        title: &str,
        _message: &str,
        buttons: &[FallbackButton],
    ) -> Option<usize> {
        self.shown
            .lock()
            .unwrap()
            .push((kind, title.to_string(), buttons.to_vec()));
        self.answer
    }
}

/// Outcome scripted for one platform call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Resolve,
    Reject,
}

/// Platform stub that resolves or rejects according to a script, then resolves.
#[derive(Default)]
pub struct ScriptedPlatform {
    locks: Mutex<Vec<Step>>,
    unlocks: Mutex<Vec<Step>>,
    pub lock_calls: AtomicUsize,
    pub unlock_calls: AtomicUsize,
}

impl ScriptedPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_lock(self, steps: &[Step]) -> Self {
        *self.locks.lock().unwrap() = steps.iter().rev().copied().collect();
        self
    }

    pub fn script_unlock(self, steps: &[Step]) -> Self {
        *self.unlocks.lock().unwrap() = steps.iter().rev().copied().collect();
        self
    }
}

impl PlatformLock for ScriptedPlatform {
    fn lock(&self) -> Result<()> {
        self.lock_calls.fetch_add(1, Ordering::SeqCst);
        match self.locks.lock().unwrap().pop() {
            Some(Step::Reject) => Err(KioskError::PlatformLockFailure("rejected".to_string())),
            _ => Ok(()),
        }
    }

    fn unlock(&self) -> Result<()> {
        self.unlock_calls.fetch_add(1, Ordering::SeqCst);
        match self.unlocks.lock().unwrap().pop() {
            Some(Step::Reject) => {
                Err(KioskError::PlatformUnlockFailure("rejected".to_string()))
            }
            _ => Ok(()),
        }
    }
}
