//! Browser implementations of the platform ports.

use std::time::Duration;

use gloo_events::EventListener;
use gloo_timers::callback::Timeout;
use gloo_utils::{document, window};
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, HtmlDocument};

use crate::components::CartCache;
use crate::csrf::{CsrfSource, CsrfToken, read_cookie};
use crate::navigation::Navigator;
use crate::scheduler::{LocalFuture, Scheduler, Spawner, Task, timer_millis};
use crate::signals::{Listener, Signal, SignalBus};

/// Reads the CSRF token from `document.cookie` on every request.
pub struct DocumentCookies {
    name: String,
}

impl DocumentCookies {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl CsrfSource for DocumentCookies {
    fn csrf_token(&self) -> Option<CsrfToken> {
        let cookies = document().dyn_into::<HtmlDocument>().ok()?.cookie().ok()?;
        read_cookie(&cookies, &self.name).map(CsrfToken::new)
    }
}

/// `setTimeout`-backed scheduler.
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        Timeout::new(timer_millis(delay), task).forget();
    }
}

/// Dispatches signals as plain DOM events on `document`.
pub struct DocumentSignals;

impl SignalBus for DocumentSignals {
    fn emit(&self, signal: Signal) {
        let dispatched = Event::new(signal.event_name())
            .and_then(|event| document().dispatch_event(&event));
        if let Err(e) = dispatched {
            warn!(signal = signal.event_name(), error = ?e, "Failed to dispatch signal");
        }
    }

    fn subscribe(&self, signal: Signal, listener: Listener) {
        EventListener::new(&document(), signal.event_name(), move |_| listener()).forget();
    }
}

/// `wasm_bindgen_futures::spawn_local`.
pub struct LocalSpawner;

impl Spawner for LocalSpawner {
    fn spawn(&self, future: LocalFuture) {
        spawn_local(future);
    }
}

/// `window.location`.
pub struct WindowNavigator;

impl Navigator for WindowNavigator {
    fn current_path(&self) -> String {
        window()
            .location()
            .pathname()
            .unwrap_or_else(|_| "/".to_string())
    }

    fn navigate(&self, url: &str) {
        if let Err(e) = window().location().set_href(url) {
            warn!(url, error = ?e, "Navigation failed");
        }
    }
}

/// The offline cart snapshot in localStorage.
pub struct LocalStorageCart {
    key: String,
}

impl LocalStorageCart {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl CartCache for LocalStorageCart {
    /// `None` when storage is blocked or the key is unset.
    fn snapshot(&self) -> Option<String> {
        window()
            .local_storage()
            .ok()
            .flatten()?
            .get_item(&self.key)
            .ok()
            .flatten()
    }
}
