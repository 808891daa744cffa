//! In-memory fakes for every port.
//!
//! Always compiled for unit tests; enable the `testing` feature to use them
//! from other crates.

#![allow(clippy::missing_panics_doc)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use technest_core::Quantity;

use crate::api::{ApiRequest, ApiResponse, Transport};
use crate::app::{Ports, Storefront};
use crate::components::{
    BadgeView, CartCache, NewsletterView, PasswordMeterView, ProductCard, QuantityField,
    Requirement, StrengthTier, WishlistIcon,
};
use crate::config::ClientConfig;
use crate::csrf::FixedCsrf;
use crate::error::ClientError;
use crate::navigation::Navigator;
use crate::registry::ControlTarget;
use crate::scheduler::{LocalFuture, Scheduler, Spawner, Task};
use crate::signals::{Listener, Signal, SignalBus};
use crate::toast::{CloseHandler, Toast, ToastId, ToastKind, ToastSurface};

/// What a scripted transport answers with.
pub type Reply = Result<ApiResponse, ClientError>;

/// Origin used by the canned responses.
pub const TEST_ORIGIN: &str = "http://shop.test";

/// Transport that replays canned replies in order and records requests.
///
/// Runs out with a transport error.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: RefCell<VecDeque<Reply>>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: RefCell::new(replies.into_iter().collect()),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Queue another reply.
    pub fn push(&self, reply: Reply) {
        self.replies.borrow_mut().push_back(reply);
    }

    /// Requests sent so far.
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        self.requests.borrow_mut().push(request);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Transport("no scripted reply".to_string())))
    }
}

/// JSON reply with `status`.
#[must_use]
pub fn json_response(status: u16, body: &serde_json::Value) -> Reply {
    Ok(ApiResponse {
        status,
        redirected: false,
        url: format!("{TEST_ORIGIN}/"),
        content_type: Some("application/json".to_string()),
        body: body.to_string(),
    })
}

/// HTML reply with `status`.
#[must_use]
pub fn text_response(status: u16, body: &str) -> Reply {
    Ok(ApiResponse {
        status,
        redirected: false,
        url: format!("{TEST_ORIGIN}/"),
        content_type: Some("text/html; charset=utf-8".to_string()),
        body: body.to_string(),
    })
}

/// HTML reply that arrived after following redirects to `url`.
#[must_use]
pub fn redirect_response(url: &str, body: &str) -> Reply {
    Ok(ApiResponse {
        status: 200,
        redirected: true,
        url: url.to_string(),
        content_type: Some("text/html; charset=utf-8".to_string()),
        body: body.to_string(),
    })
}

/// Virtual-time scheduler. Nothing runs until [`ManualScheduler::advance`].
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    seq: Cell<u64>,
    pending: RefCell<Vec<(Duration, u64, Task)>>,
}

impl ManualScheduler {
    /// Virtual time elapsed so far.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Tasks not yet run.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Move the clock forward, running every task that falls due in order.
    /// Tasks scheduled while advancing run too if they fall due in the window.
    pub fn advance(&self, by: Duration) {
        let target = self.now.get() + by;
        while let Some((due, task)) = self.pop_due(target) {
            self.now.set(due);
            task();
        }
        self.now.set(target);
    }

    fn pop_due(&self, target: Duration) -> Option<(Duration, Task)> {
        let mut pending = self.pending.borrow_mut();
        let index = pending
            .iter()
            .enumerate()
            .filter(|(_, (due, _, _))| *due <= target)
            .min_by_key(|(_, (due, seq, _))| (*due, *seq))
            .map(|(i, _)| i)?;
        let (due, _, task) = pending.remove(index);
        Some((due, task))
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        let seq = self.seq.get();
        self.seq.set(seq + 1);
        self.pending
            .borrow_mut()
            .push((self.now.get() + delay, seq, task));
    }
}

/// Calls a [`ToastSurface`] received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    Mounted(ToastId),
    Revealed(ToastId),
    HideStarted(ToastId),
    Removed(ToastId),
}

/// Toast surface that records calls and keeps close buttons clickable.
#[derive(Default)]
pub struct RecordingSurface {
    events: RefCell<Vec<SurfaceEvent>>,
    mounted: RefCell<Vec<Toast>>,
    close_handlers: RefCell<BTreeMap<ToastId, Rc<dyn Fn()>>>,
}

impl RecordingSurface {
    #[must_use]
    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.borrow().clone()
    }

    /// Every toast ever mounted, in order.
    #[must_use]
    pub fn mounted(&self) -> Vec<Toast> {
        self.mounted.borrow().clone()
    }

    /// Kind and message of every toast ever mounted.
    #[must_use]
    pub fn shown(&self) -> Vec<(ToastKind, String)> {
        self.mounted
            .borrow()
            .iter()
            .map(|t| (t.kind, t.message.clone()))
            .collect()
    }

    /// Click the close button of toast `id`.
    pub fn close(&self, id: ToastId) {
        let handler = self.close_handlers.borrow().get(&id).cloned();
        if let Some(handler) = handler {
            handler();
        }
    }
}

impl ToastSurface for RecordingSurface {
    fn mount(&self, id: ToastId, toast: &Toast, on_close: CloseHandler) {
        self.events.borrow_mut().push(SurfaceEvent::Mounted(id));
        self.mounted.borrow_mut().push(toast.clone());
        self.close_handlers
            .borrow_mut()
            .insert(id, Rc::from(on_close));
    }

    fn reveal(&self, id: ToastId) {
        self.events.borrow_mut().push(SurfaceEvent::Revealed(id));
    }

    fn begin_hide(&self, id: ToastId) {
        self.events.borrow_mut().push(SurfaceEvent::HideStarted(id));
    }

    fn remove(&self, id: ToastId) {
        self.events.borrow_mut().push(SurfaceEvent::Removed(id));
        self.close_handlers.borrow_mut().remove(&id);
    }
}

/// Signal bus that records every signal and calls its subscribers.
#[derive(Default)]
pub struct RecordingBus {
    emitted: RefCell<Vec<Signal>>,
    listeners: RefCell<Vec<(Signal, Rc<dyn Fn()>)>>,
}

impl RecordingBus {
    #[must_use]
    pub fn emitted(&self) -> Vec<Signal> {
        self.emitted.borrow().clone()
    }

    /// Number of listeners subscribed to `signal`.
    #[must_use]
    pub fn listener_count(&self, signal: Signal) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(s, _)| *s == signal)
            .count()
    }
}

impl SignalBus for RecordingBus {
    fn emit(&self, signal: Signal) {
        self.emitted.borrow_mut().push(signal);
        // Released before calling out: a listener may subscribe or emit.
        let listeners: Vec<_> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(s, _)| *s == signal)
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }

    fn subscribe(&self, signal: Signal, listener: Listener) {
        self.listeners.borrow_mut().push((signal, Rc::from(listener)));
    }
}

/// Spawner that queues futures until the test runs them.
#[derive(Default)]
pub struct QueuedSpawner {
    queue: RefCell<VecDeque<LocalFuture>>,
}

impl QueuedSpawner {
    /// Futures spawned and not yet run.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run queued futures in spawn order, including any they spawn.
    pub async fn run_until_idle(&self) {
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(future) = next else {
                break;
            };
            future.await;
        }
    }
}

impl Spawner for QueuedSpawner {
    fn spawn(&self, future: LocalFuture) {
        self.queue.borrow_mut().push_back(future);
    }
}

/// Navigator sitting on a fixed path that records where it was sent.
pub struct RecordingNavigator {
    path: String,
    visits: RefCell<Vec<String>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            visits: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn visits(&self) -> Vec<String> {
        self.visits.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.path.clone()
    }

    fn navigate(&self, url: &str) {
        self.visits.borrow_mut().push(url.to_string());
    }
}

/// Badge holding its text and visibility.
#[derive(Default)]
pub struct FakeBadge {
    text: RefCell<String>,
    visible: Cell<bool>,
}

impl FakeBadge {
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    /// Text and visibility together.
    #[must_use]
    pub fn state(&self) -> (String, bool) {
        (self.text.borrow().clone(), self.visible.get())
    }
}

impl BadgeView for FakeBadge {
    fn text(&self) -> String {
        self.text.borrow().clone()
    }

    fn show(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
        self.visible.set(true);
    }

    fn hide(&self) {
        self.visible.set(false);
    }
}

/// Offline cart snapshot held in memory.
pub struct MemoryCartCache(Option<String>);

impl MemoryCartCache {
    #[must_use]
    pub fn new(snapshot: Option<&str>) -> Self {
        Self(snapshot.map(str::to_owned))
    }
}

impl CartCache for MemoryCartCache {
    fn snapshot(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Quantity input.
pub struct FakeField {
    value: RefCell<String>,
    max: Option<String>,
}

impl FakeField {
    #[must_use]
    pub fn new(value: &str, max: Option<&str>) -> Self {
        Self {
            value: RefCell::new(value.to_string()),
            max: max.map(str::to_owned),
        }
    }

    #[must_use]
    pub fn value(&self) -> String {
        self.value.borrow().clone()
    }
}

impl QuantityField for FakeField {
    fn raw_value(&self) -> String {
        self.value()
    }

    fn max_attr(&self) -> Option<String> {
        self.max.clone()
    }

    fn set_value(&self, quantity: Quantity) {
        *self.value.borrow_mut() = quantity.to_string();
    }
}

/// Product card with fixed attributes.
pub struct FakeCard {
    product_id: Option<String>,
    quantity: Option<String>,
    max: Option<String>,
}

impl FakeCard {
    #[must_use]
    pub fn new(product_id: Option<&str>, quantity: Option<&str>, max: Option<&str>) -> Self {
        Self {
            product_id: product_id.map(str::to_owned),
            quantity: quantity.map(str::to_owned),
            max: max.map(str::to_owned),
        }
    }
}

impl ProductCard for FakeCard {
    fn product_id(&self) -> Option<String> {
        self.product_id.clone()
    }

    fn quantity_value(&self) -> Option<String> {
        self.quantity.clone()
    }

    fn max_attr(&self) -> Option<String> {
        self.max.clone()
    }
}

/// Wishlist icon. `None` until first set.
#[derive(Default)]
pub struct FakeIcon {
    active: Cell<Option<bool>>,
}

impl FakeIcon {
    #[must_use]
    pub fn active(&self) -> Option<bool> {
        self.active.get()
    }
}

impl WishlistIcon for FakeIcon {
    fn set_active(&self, active: bool) {
        self.active.set(Some(active));
    }
}

/// Newsletter form recording every button change.
pub struct FakeNewsletter {
    email: RefCell<String>,
    label: RefCell<String>,
    button_history: RefCell<Vec<(String, bool)>>,
}

impl FakeNewsletter {
    #[must_use]
    pub fn new(email: &str, label: &str) -> Self {
        Self {
            email: RefCell::new(email.to_string()),
            label: RefCell::new(label.to_string()),
            button_history: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn email(&self) -> String {
        self.email.borrow().clone()
    }

    /// Every `(label, enabled)` the button was set to.
    #[must_use]
    pub fn button_history(&self) -> Vec<(String, bool)> {
        self.button_history.borrow().clone()
    }
}

impl NewsletterView for FakeNewsletter {
    fn email_value(&self) -> String {
        self.email()
    }

    fn clear_email(&self) {
        self.email.borrow_mut().clear();
    }

    fn button_label(&self) -> String {
        self.label.borrow().clone()
    }

    fn set_button(&self, label: &str, enabled: bool) {
        *self.label.borrow_mut() = label.to_string();
        self.button_history
            .borrow_mut()
            .push((label.to_string(), enabled));
    }
}

/// Password meter keeping the last rendered state.
#[derive(Default)]
pub struct FakeMeter {
    requirements: RefCell<HashMap<Requirement, bool>>,
    strength: RefCell<Option<(StrengthTier, String)>>,
}

impl FakeMeter {
    #[must_use]
    pub fn requirement(&self, requirement: Requirement) -> Option<bool> {
        self.requirements.borrow().get(&requirement).copied()
    }

    #[must_use]
    pub fn strength(&self) -> Option<(StrengthTier, String)> {
        self.strength.borrow().clone()
    }
}

impl PasswordMeterView for FakeMeter {
    fn set_requirement(&self, requirement: Requirement, met: bool) {
        self.requirements.borrow_mut().insert(requirement, met);
    }

    fn set_strength(&self, tier: StrengthTier, text: &str) {
        *self.strength.borrow_mut() = Some((tier, text.to_string()));
    }
}

/// A clicked control and what surrounds it.
#[derive(Clone, Default)]
pub struct FakeTarget {
    pub field: Option<Rc<FakeField>>,
    pub card: Option<Rc<FakeCard>>,
    pub product_id: Option<String>,
    pub icon: Option<Rc<FakeIcon>>,
}

impl ControlTarget for FakeTarget {
    fn quantity_field(&self) -> Option<Rc<dyn QuantityField>> {
        self.field
            .clone()
            .map(|field| field as Rc<dyn QuantityField>)
    }

    fn product_card(&self) -> Option<Rc<dyn ProductCard>> {
        self.card.clone().map(|card| card as Rc<dyn ProductCard>)
    }

    fn product_id(&self) -> Option<String> {
        self.product_id.clone()
    }

    fn icon(&self) -> Option<Rc<dyn WishlistIcon>> {
        self.icon.clone().map(|icon| icon as Rc<dyn WishlistIcon>)
    }
}

/// A storefront wired to recording fakes.
///
/// The page path is `/shop/phones` and the CSRF cookie holds `test-token`.
pub struct Harness<T> {
    pub storefront: Storefront<T>,
    pub surface: Rc<RecordingSurface>,
    pub scheduler: Rc<ManualScheduler>,
    pub spawner: Rc<QueuedSpawner>,
    pub signals: Rc<RecordingBus>,
    pub navigator: Rc<RecordingNavigator>,
}

impl<T: Transport + 'static> Harness<T> {
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self::with_config(ClientConfig::default(), transport)
    }

    #[must_use]
    pub fn with_config(config: ClientConfig, transport: T) -> Self {
        let surface = Rc::new(RecordingSurface::default());
        let scheduler = Rc::new(ManualScheduler::default());
        let spawner = Rc::new(QueuedSpawner::default());
        let signals = Rc::new(RecordingBus::default());
        let navigator = Rc::new(RecordingNavigator::new("/shop/phones"));

        let ports = Ports {
            csrf: Rc::new(FixedCsrf::new("test-token")),
            toast_surface: Box::new(Rc::clone(&surface)),
            scheduler: Rc::clone(&scheduler) as Rc<dyn Scheduler>,
            spawner: Rc::clone(&spawner) as Rc<dyn Spawner>,
            signals: Rc::clone(&signals) as Rc<dyn SignalBus>,
            navigator: Rc::clone(&navigator) as Rc<dyn Navigator>,
        };

        Self {
            storefront: Storefront::new(config, transport, ports),
            surface,
            scheduler,
            spawner,
            signals,
            navigator,
        }
    }
}
