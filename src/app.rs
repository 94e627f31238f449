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

//! Application root: owns the alert bridge and wires the modal host, lock
//! controller and SIM watcher to it.

use crate::alert::{AlertBridge, FallbackDialog};
use crate::config::KioskConfig;
use crate::kiosk::{BackDispatcher, LockController, PlatformLock};
use crate::modal::{ModalHost, ModalPresenter, MountedHost};
use crate::sim::SimWatcher;
use log::debug;
use std::sync::Arc;

pub struct KioskApp {
    bridge: Arc<AlertBridge>,
    presenter: Arc<dyn ModalPresenter>,
    host: Arc<ModalHost>,
    mounted: Option<MountedHost>,
    back: Arc<BackDispatcher>,
    controller: Arc<LockController>,
    sim: SimWatcher,
}

impl KioskApp {
    /// Builds the app with a freshly mounted modal host.
    pub fn new(
        config: &KioskConfig,
        platform: Arc<dyn PlatformLock>,
        presenter: Arc<dyn ModalPresenter>,
        fallback: Arc<dyn FallbackDialog>,
        sim_baseline: Option<String>,
    ) -> Self {
        let bridge = Arc::new(AlertBridge::from_config(config, fallback));
        let host = ModalHost::new(presenter.clone());
        let mounted = host.mount(&bridge);
        let back = Arc::new(BackDispatcher::new());
        let controller = LockController::new(
            bridge.clone(),
            platform,
            back.clone(),
            config.kiosk.clone(),
        );
        let sim = SimWatcher::new(bridge.clone(), sim_baseline);

        Self {
            bridge,
            presenter,
            host,
            mounted: Some(mounted),
            back,
            controller,
            sim,
        }
    }

    pub fn bridge(&self) -> &Arc<AlertBridge> {
        &self.bridge
    }

    pub fn host(&self) -> &Arc<ModalHost> {
        &self.host
    }

    pub fn back(&self) -> &Arc<BackDispatcher> {
        &self.back
    }

    pub fn controller(&self) -> &Arc<LockController> {
        &self.controller
    }

    pub fn sim(&self) -> &SimWatcher {
        &self.sim
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.as_ref().is_some_and(MountedHost::is_active)
    }

    pub fn unmount(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            mounted.unmount();
        }
    }

    /// Mounts a new host instance, as a screen transition would. The new host
    /// binds before the old one unbinds, exercising the stale-unbind guard.
    pub fn remount(&mut self) {
        let host = ModalHost::new(self.presenter.clone());
        let mounted = host.mount(&self.bridge);
        let previous = self.mounted.replace(mounted);
        self.host = host;
        drop(previous);
        debug!("Modal host remounted");
    }
}
