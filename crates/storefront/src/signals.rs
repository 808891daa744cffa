//! In-page signals that couple otherwise independent components.

/// A payload-free notification any component may raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// The server-side cart changed; the badge should refetch its count.
    CartUpdated,
}

impl Signal {
    /// DOM event name used when the signal is dispatched on `document`.
    #[must_use]
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::CartUpdated => "cartUpdated",
        }
    }
}

/// Callback run each time a signal is raised.
pub type Listener = Box<dyn Fn()>;

/// Dispatches signals to whoever listens.
pub trait SignalBus {
    /// Raise `signal` to every listener.
    fn emit(&self, signal: Signal);

    /// Run `listener` on every later `signal`, for the life of the page.
    fn subscribe(&self, signal: Signal, listener: Listener);
}
