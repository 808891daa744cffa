//! Toast notifications.
//!
//! [`ToastManager`] owns the list of on-screen toasts. Each `show` creates an
//! independent entry: nothing is deduplicated and there is no cap on how many
//! are visible at once.
//!
//! # Lifecycle
//!
//! ```text
//! show ──► Entering ──(enter delay)──► Visible
//!             │                          │
//!             └──── dismiss ─────────────┴──► Hiding ──(exit delay)──► removed
//! ```
//!
//! `dismiss` is triggered by the auto-dismiss timer (when the duration is
//! non-zero) or by the close button, and behaves the same either way.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ToastConfig;
use crate::scheduler::Scheduler;

/// Duration used when a caller does not pick one.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(4000);

/// Toast severity. Drives the CSS class, icon and default title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl ToastKind {
    /// Parse a kind name; anything unrecognised is [`ToastKind::Info`].
    #[must_use]
    pub fn parse_lenient(kind: &str) -> Self {
        match kind.trim().to_ascii_lowercase().as_str() {
            "success" => Self::Success,
            "error" => Self::Error,
            "warning" => Self::Warning,
            _ => Self::Info,
        }
    }

    /// CSS modifier class.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    /// Icon glyph.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Success => "\u{2713}",
            Self::Error => "\u{2715}",
            Self::Warning => "\u{26a0}",
            Self::Info => "\u{2139}",
        }
    }

    /// Title used when the caller gives none.
    #[must_use]
    pub const fn default_title(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Error => "Error",
            Self::Warning => "Warning",
            Self::Info => "Info",
        }
    }
}

/// Handle to a shown toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(u32);

impl ToastId {
    /// Create a handle from its raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw value, for handing to page scripts.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// A notification to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub title: Option<String>,
    /// Zero means the toast stays until closed.
    pub duration: Duration,
}

impl Toast {
    /// Title to render: the caller's, or the kind's default.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.kind.default_title())
    }

    /// Whether the toast waits for an explicit close.
    #[must_use]
    pub const fn is_persistent(&self) -> bool {
        self.duration.is_zero()
    }
}

/// Callback a surface invokes when the toast's close button is activated.
pub type CloseHandler = Box<dyn Fn()>;

/// Where toasts are drawn.
///
/// The surface creates its container lazily on the first `mount` and reuses
/// it afterwards.
pub trait ToastSurface {
    /// Append a rendered toast to the container, wiring its close button to `on_close`.
    fn mount(&self, id: ToastId, toast: &Toast, on_close: CloseHandler);
    /// Start the entry transition (`show` class).
    fn reveal(&self, id: ToastId);
    /// Start the exit transition (`hiding` class).
    fn begin_hide(&self, id: ToastId);
    /// Detach the node.
    fn remove(&self, id: ToastId);
}

impl<S: ToastSurface + ?Sized> ToastSurface for Rc<S> {
    fn mount(&self, id: ToastId, toast: &Toast, on_close: CloseHandler) {
        (**self).mount(id, toast, on_close);
    }

    fn reveal(&self, id: ToastId) {
        (**self).reveal(id);
    }

    fn begin_hide(&self, id: ToastId) {
        (**self).begin_hide(id);
    }

    fn remove(&self, id: ToastId) {
        (**self).remove(id);
    }
}

/// Where a tracked toast is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Entering,
    Visible,
    Hiding,
}

/// Shows and dismisses toasts.
///
/// Cheap to clone; clones share the same list.
#[derive(Clone)]
pub struct ToastManager {
    inner: Rc<ToastManagerInner>,
}

struct ToastManagerInner {
    surface: Box<dyn ToastSurface>,
    scheduler: Rc<dyn Scheduler>,
    timings: ToastConfig,
    next_id: Cell<u32>,
    entries: RefCell<Vec<(ToastId, ToastPhase)>>,
}

impl ToastManager {
    /// Create a manager drawing on `surface`.
    #[must_use]
    pub fn new(
        surface: Box<dyn ToastSurface>,
        scheduler: Rc<dyn Scheduler>,
        timings: ToastConfig,
    ) -> Self {
        Self {
            inner: Rc::new(ToastManagerInner {
                surface,
                scheduler,
                timings,
                next_id: Cell::new(1),
                entries: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Show a toast.
    ///
    /// A zero `duration` keeps the toast until it is closed.
    pub fn show(
        &self,
        message: impl Into<String>,
        kind: ToastKind,
        duration: Duration,
        title: Option<&str>,
    ) -> ToastId {
        let inner = &self.inner;
        let id = ToastId(inner.next_id.get());
        inner.next_id.set(inner.next_id.get().wrapping_add(1));

        let toast = Toast {
            message: message.into(),
            kind,
            title: title.map(str::to_owned),
            duration,
        };
        debug!(id = id.0, kind = kind.as_str(), ?duration, "Showing toast");

        inner
            .entries
            .borrow_mut()
            .push((id, ToastPhase::Entering));

        let weak = Rc::downgrade(inner);
        inner.surface.mount(
            id,
            &toast,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    ToastManagerInner::dismiss(&inner, id);
                }
            }),
        );

        let weak = Rc::downgrade(inner);
        inner.scheduler.schedule(
            inner.timings.enter_delay(),
            Box::new(move || with_inner(&weak, |inner| inner.reveal(id))),
        );

        if !toast.is_persistent() {
            let weak = Rc::downgrade(inner);
            inner.scheduler.schedule(
                duration,
                Box::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        ToastManagerInner::dismiss(&inner, id);
                    }
                }),
            );
        }

        id
    }

    /// Show a toast with the kind's default duration.
    pub fn notify(&self, kind: ToastKind, message: impl Into<String>, title: Option<&str>) -> ToastId {
        let duration = self.inner.timings.duration_for(kind);
        self.show(message, kind, duration, title)
    }

    /// Success toast, 4 seconds by default.
    pub fn success(&self, message: impl Into<String>) -> ToastId {
        self.notify(ToastKind::Success, message, None)
    }

    /// Error toast, 5 seconds by default.
    pub fn error(&self, message: impl Into<String>) -> ToastId {
        self.notify(ToastKind::Error, message, None)
    }

    /// Warning toast, 4.5 seconds by default.
    pub fn warning(&self, message: impl Into<String>) -> ToastId {
        self.notify(ToastKind::Warning, message, None)
    }

    /// Info toast, 4 seconds by default.
    pub fn info(&self, message: impl Into<String>) -> ToastId {
        self.notify(ToastKind::Info, message, None)
    }

    /// Start dismissing a toast. Unknown or already-hiding toasts are ignored.
    pub fn dismiss(&self, id: ToastId) {
        ToastManagerInner::dismiss(&self.inner, id);
    }

    /// Handles of all tracked toasts, oldest first.
    #[must_use]
    pub fn active(&self) -> Vec<ToastId> {
        self.inner
            .entries
            .borrow()
            .iter()
            .map(|(id, _)| *id)
            .collect()
    }

    /// Lifecycle phase of a tracked toast.
    #[must_use]
    pub fn phase(&self, id: ToastId) -> Option<ToastPhase> {
        self.inner.phase(id)
    }

    /// Number of tracked toasts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    /// Whether no toast is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn with_inner(weak: &Weak<ToastManagerInner>, f: impl FnOnce(&ToastManagerInner)) {
    if let Some(inner) = weak.upgrade() {
        f(&inner);
    }
}

impl ToastManagerInner {
    fn phase(&self, id: ToastId) -> Option<ToastPhase> {
        self.entries
            .borrow()
            .iter()
            .find(|(entry, _)| *entry == id)
            .map(|(_, phase)| *phase)
    }

    /// Move `id` from `from` to `to`. Returns false if it was elsewhere.
    fn transition(&self, id: ToastId, from: &[ToastPhase], to: ToastPhase) -> bool {
        let mut entries = self.entries.borrow_mut();
        match entries.iter_mut().find(|(entry, _)| *entry == id) {
            Some((_, phase)) if from.contains(phase) => {
                *phase = to;
                true
            }
            _ => false,
        }
    }

    fn reveal(&self, id: ToastId) {
        if self.transition(id, &[ToastPhase::Entering], ToastPhase::Visible) {
            self.surface.reveal(id);
        }
    }

    fn dismiss(this: &Rc<Self>, id: ToastId) {
        if !this.transition(
            id,
            &[ToastPhase::Entering, ToastPhase::Visible],
            ToastPhase::Hiding,
        ) {
            return;
        }
        debug!(id = id.0, "Dismissing toast");
        this.surface.begin_hide(id);

        let weak = Rc::downgrade(this);
        this.scheduler.schedule(
            this.timings.exit_delay(),
            Box::new(move || with_inner(&weak, |inner| inner.remove(id))),
        );
    }

    fn remove(&self, id: ToastId) {
        self.entries.borrow_mut().retain(|(entry, _)| *entry != id);
        self.surface.remove(id);
    }
}
