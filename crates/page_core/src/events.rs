use std::{
    fmt,
    future::Future,
    pin::Pin,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, PoisonError, Weak,
    },
    task::{Context, Poll},
};

use shared::domain::{CartItem, PhoneId};
use tokio::sync::oneshot;
use tracing::trace;

pub trait Event: Clone + Send + Sync + 'static {
    type Kind: Copy + Eq + fmt::Debug + Send + Sync + 'static;

    fn kind(&self) -> Self::Kind;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Subscription<E: Event> {
    handle: SubscriptionHandle,
    kind: E::Kind,
    handler: Handler<E>,
}

/// Named-event bus owned by a component.
///
/// Handlers run on the emitting task, outside the subscriber lock, so a handler may
/// subscribe or unsubscribe (itself included) while it runs.
pub struct EventBus<E: Event> {
    next_handle: AtomicU64,
    subscriptions: Mutex<Vec<Subscription<E>>>,
}

impl<E: Event> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            next_handle: AtomicU64::new(1),
            subscriptions: Mutex::new(Vec::new()),
        }
    }
}

impl<E: Event> EventBus<E> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn subscribe<F>(&self, kind: E::Kind, handler: F) -> SubscriptionHandle
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.subscribe_with(kind, |_| handler)
    }

    /// Like [`subscribe`](Self::subscribe), but hands the handle to `make` before the
    /// handler is registered, so the handler can refer to its own subscription.
    pub fn subscribe_with<M, F>(&self, kind: E::Kind, make: M) -> SubscriptionHandle
    where
        M: FnOnce(SubscriptionHandle) -> F,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let handle = SubscriptionHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        let handler: Handler<E> = Arc::new(make(handle));
        self.lock().push(Subscription {
            handle,
            kind,
            handler,
        });
        trace!(?kind, handle = handle.0, "subscribed");
        handle
    }

    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        let mut subscriptions = self.lock();
        let before = subscriptions.len();
        subscriptions.retain(|sub| sub.handle != handle);
        before != subscriptions.len()
    }

    pub fn emit(&self, event: E) -> usize {
        let kind = event.kind();
        let handlers: Vec<Handler<E>> = self
            .lock()
            .iter()
            .filter(|sub| sub.kind == kind)
            .map(|sub| Arc::clone(&sub.handler))
            .collect();
        trace!(?kind, handlers = handlers.len(), "emit");
        for handler in &handlers {
            handler(&event);
        }
        handlers.len()
    }

    pub fn subscriber_count(&self, kind: E::Kind) -> usize {
        self.lock().iter().filter(|sub| sub.kind == kind).count()
    }

    /// One-shot subscription: the handler detaches itself on the first matching event and
    /// resolves the returned signal with it.
    pub fn once(self: &Arc<Self>, kind: E::Kind) -> OnceSignal<E> {
        let (tx, rx) = oneshot::channel();
        let tx = Mutex::new(Some(tx));
        let bus = Arc::downgrade(self);
        let handle = self.subscribe_with(kind, |handle| {
            let bus = bus.clone();
            move |event: &E| {
                // Only the call that actually removed the handler may resolve.
                let detached = bus
                    .upgrade()
                    .is_some_and(|bus| bus.unsubscribe(handle));
                if !detached {
                    return;
                }
                let sender = tx.lock().unwrap_or_else(PoisonError::into_inner).take();
                if let Some(sender) = sender {
                    let _ = sender.send(event.clone());
                }
            }
        });
        OnceSignal { rx, handle, bus }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Subscription<E>>> {
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Pending result of [`EventBus::once`]. Dropping it before the event fires detaches the
/// listener.
pub struct OnceSignal<E: Event> {
    rx: oneshot::Receiver<E>,
    handle: SubscriptionHandle,
    bus: Weak<EventBus<E>>,
}

impl<E: Event> OnceSignal<E> {
    pub fn handle(&self) -> SubscriptionHandle {
        self.handle
    }
}

impl<E: Event> Future for OnceSignal<E> {
    type Output = Result<E, oneshot::error::RecvError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx)
    }
}

impl<E: Event> Drop for OnceSignal<E> {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.unsubscribe(self.handle);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogueEvent {
    PhoneSelected(PhoneId),
    ExtraAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogueEventKind {
    PhoneSelected,
    ExtraAction,
}

impl Event for CatalogueEvent {
    type Kind = CatalogueEventKind;

    fn kind(&self) -> Self::Kind {
        match self {
            CatalogueEvent::PhoneSelected(_) => CatalogueEventKind::PhoneSelected,
            CatalogueEvent::ExtraAction => CatalogueEventKind::ExtraAction,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    Back,
    Add(CartItem),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerEventKind {
    Back,
    Add,
}

impl Event for ViewerEvent {
    type Kind = ViewerEventKind;

    fn kind(&self) -> Self::Kind {
        match self {
            ViewerEvent::Back => ViewerEventKind::Back,
            ViewerEvent::Add(_) => ViewerEventKind::Add,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    ValueChanged(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEventKind {
    ValueChanged,
}

impl Event for SearchEvent {
    type Kind = SearchEventKind;

    fn kind(&self) -> Self::Kind {
        SearchEventKind::ValueChanged
    }
}

#[cfg(test)]
#[path = "tests/events_tests.rs"]
mod tests;
