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

//! Hardware back/home event plumbing.

use crate::alert::state::IMPLICIT_ACTION_LABEL;
use crate::alert::{ActionCallback, AlertAction, AlertBridge};
use crate::config::KioskSettings;
use log::{debug, trace};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackDisposition {
    /// The handler took the event; default navigation must not run.
    Consumed,
    Propagate,
}

pub trait BackHandler: Send + Sync {
    fn on_back_pressed(&self) -> BackDisposition;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackSubscription(u64);

/// Subscribe/unsubscribe pair provided by the host platform.
pub trait BackEventSource: Send + Sync {
    fn subscribe(&self, handler: Arc<dyn BackHandler>) -> BackSubscription;

    /// Returns `false` when the subscription was already removed.
    fn unsubscribe(&self, subscription: BackSubscription) -> bool;
}

/// In-process back event source. The most recent subscriber sees events first.
#[derive(Default)]
pub struct BackDispatcher {
    handlers: Mutex<Vec<(BackSubscription, Arc<dyn BackHandler>)>>,
    next_id: AtomicU64,
}

impl BackDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers one back press. `Propagate` means the platform should navigate back.
    pub fn press(&self) -> BackDisposition {
        let handlers: Vec<Arc<dyn BackHandler>> = self
            .handlers()
            .iter()
            .rev()
            .map(|(_, handler)| handler.clone())
            .collect();

        for handler in handlers {
            if handler.on_back_pressed() == BackDisposition::Consumed {
                trace!("Back press consumed");
                return BackDisposition::Consumed;
            }
        }
        BackDisposition::Propagate
    }

    pub fn handler_count(&self) -> usize {
        self.handlers().len()
    }

    fn handlers(&self) -> MutexGuard<'_, Vec<(BackSubscription, Arc<dyn BackHandler>)>> {
        self.handlers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl BackEventSource for BackDispatcher {
    fn subscribe(&self, handler: Arc<dyn BackHandler>) -> BackSubscription {
        let subscription = BackSubscription(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers().push((subscription, handler));
        debug!("Back handler {subscription:?} registered");
        subscription
    }

    fn unsubscribe(&self, subscription: BackSubscription) -> bool {
        let mut handlers = self.handlers();
        let before = handlers.len();
        handlers.retain(|(id, _)| *id != subscription);
        let removed = handlers.len() != before;
        if removed {
            debug!("Back handler {subscription:?} removed");
        }
        removed
    }
}

/// Swallows back presses while kiosk mode is active and tells the user why.
pub struct KioskBackHandler {
    bridge: Arc<AlertBridge>,
    title: String,
    message: String,
    on_acknowledge: Option<ActionCallback>,
}

impl KioskBackHandler {
    pub fn new(bridge: Arc<AlertBridge>, settings: &KioskSettings) -> Self {
        Self {
            bridge,
            title: settings.navigation_title.clone(),
            message: settings.navigation_message.clone(),
            on_acknowledge: None,
        }
    }

    /// Runs `callback` when the user acknowledges the navigation notice.
    pub fn on_acknowledge<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_acknowledge = Some(Arc::new(callback));
        self
    }
}

impl BackHandler for KioskBackHandler {
    fn on_back_pressed(&self) -> BackDisposition {
        let acknowledge = AlertAction::default_action(IMPLICIT_ACTION_LABEL)
            .with_callback(self.on_acknowledge.clone());
        self.bridge
            .show_info(self.title.clone(), self.message.clone(), vec![acknowledge]);
        BackDisposition::Consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct Fixed(BackDisposition, Arc<AtomicUsize>);

    impl BackHandler for Fixed {
        fn on_back_pressed(&self) -> BackDisposition {
            self.1.fetch_add(1, Ordering::SeqCst);
            self.0
        }
    }

    #[test]
    fn no_handlers_propagates() {
        let dispatcher = BackDispatcher::new();
        assert_eq!(dispatcher.press(), BackDisposition::Propagate);
    }

    #[test]
    fn latest_handler_runs_first() {
        let dispatcher = BackDispatcher::new();
        let older = Arc::new(AtomicUsize::new(0));
        let newer = Arc::new(AtomicUsize::new(0));
        dispatcher.subscribe(Arc::new(Fixed(BackDisposition::Consumed, older.clone())));
        dispatcher.subscribe(Arc::new(Fixed(BackDisposition::Consumed, newer.clone())));

        assert_eq!(dispatcher.press(), BackDisposition::Consumed);
        assert_eq!(newer.load(Ordering::SeqCst), 1);
        assert_eq!(older.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn propagating_handler_falls_through() {
        let dispatcher = BackDispatcher::new();
        let hits = Arc::new(AtomicUsize::new(0));
        dispatcher.subscribe(Arc::new(Fixed(BackDisposition::Propagate, hits.clone())));
        dispatcher.subscribe(Arc::new(Fixed(BackDisposition::Propagate, hits.clone())));

        assert_eq!(dispatcher.press(), BackDisposition::Propagate);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let dispatcher = BackDispatcher::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let id = dispatcher.subscribe(Arc::new(Fixed(BackDisposition::Consumed, hits)));
        assert_eq!(dispatcher.handler_count(), 1);
        assert!(dispatcher.unsubscribe(id));
        assert!(!dispatcher.unsubscribe(id));
        assert_eq!(dispatcher.handler_count(), 0);
    }

    #[test]
    fn kiosk_handler_consumes_and_alerts() {
        let bridge = Arc::new(AlertBridge::default());
        let handler = KioskBackHandler::new(bridge, &KioskSettings::default());
        assert_eq!(handler.on_back_pressed(), BackDisposition::Consumed);
    }

    #[test]
    fn acknowledging_the_notice_runs_the_callback() {
        let bridge = Arc::new(AlertBridge::default());
        let host = crate::modal::ModalHost::headless();
        let _mounted = host.mount(&bridge);
        let acknowledged = Arc::new(AtomicUsize::new(0));
        let handler = KioskBackHandler::new(bridge, &KioskSettings::default()).on_acknowledge({
            let acknowledged = acknowledged.clone();
            move || {
                acknowledged.fetch_add(1, Ordering::SeqCst);
            }
        });

        handler.on_back_pressed();
        let view = host.current_view().unwrap();
        assert_eq!(view.buttons.len(), 1);
        assert_eq!(view.buttons[0].label, IMPLICIT_ACTION_LABEL);

        assert!(host.invoke(0));
        assert_eq!(acknowledged.load(Ordering::SeqCst), 1);
        assert!(!host.is_visible());
    }
}
