// vim: tw=80
//! Event subscriptions on a mock.
//!
//! Handlers subscribe either directly through [`EventRegistry::subscribe`],
//! or by dispatching the event's `add_` member with an [`EventHandler`]
//! argument, as the code under test would.  [`Mock::raise`](crate::Mock::raise)
//! then delivers arguments to every current subscriber.

use std::{
    collections::HashMap,
    fmt,
    sync::{
        Arc,
        Mutex,
        atomic::{AtomicU64, Ordering}
    }
};
use tracing::debug;

use crate::{
    Error,
    Result,
    lock,
    value::Value
};

type HandlerFn = dyn Fn(&[Value]) -> Result<()> + Send + Sync;

/// A subscriber to an event.  Two handlers are equal iff they are clones of
/// each other.
#[derive(Clone)]
pub struct EventHandler(Arc<HandlerFn>);

impl EventHandler {
    pub fn new<F>(f: F) -> Self
        where F: Fn(&[Value]) -> Result<()> + Send + Sync + 'static
    {
        EventHandler(Arc::new(f))
    }

    fn call(&self, args: &[Value]) -> Result<()> {
        (self.0)(args)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EventHandler({:p})", Arc::as_ptr(&self.0))
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<EventHandler> for Value {
    fn from(h: EventHandler) -> Self {
        Value::object(h)
    }
}

/// Receipt for one subscription, used to cancel it.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Subscription {
    event: String,
    id: u64,
}

impl Subscription {
    pub fn event(&self) -> &str {
        &self.event
    }
}

#[derive(Default)]
pub struct EventRegistry {
    handlers: Mutex<HashMap<String, Vec<(u64, EventHandler)>>>,
    next_id: AtomicU64,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, event: &str, handler: EventHandler) -> Subscription
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.handlers).entry(event.to_owned())
            .or_default()
            .push((id, handler));
        Subscription{event: event.to_owned(), id}
    }

    /// Cancel a subscription.  Returns `false` if it was already gone.
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        let mut handlers = lock(&self.handlers);
        let Some(list) = handlers.get_mut(&subscription.event) else {
            return false;
        };
        let before = list.len();
        list.retain(|(id, _)| *id != subscription.id);
        before != list.len()
    }

    /// Cancel the oldest subscription of `handler` to `event`.
    pub fn unsubscribe_handler(&self, event: &str, handler: &EventHandler)
        -> bool
    {
        let mut handlers = lock(&self.handlers);
        let Some(list) = handlers.get_mut(event) else {
            return false;
        };
        match list.iter().position(|(_, h)| h == handler) {
            Some(i) => {
                list.remove(i);
                true
            },
            None => false
        }
    }

    pub fn handler_count(&self, event: &str) -> usize {
        lock(&self.handlers).get(event).map_or(0, Vec::len)
    }

    /// Invoke every handler of `event`, in subscription order.
    ///
    /// All handlers run even if some fail; the first failure is returned
    /// afterwards.  On success, returns the number of handlers invoked.
    pub fn raise(&self, event: &str, args: &[Value]) -> Result<usize> {
        let snapshot = lock(&self.handlers).get(event)
            .cloned()
            .unwrap_or_default();
        debug!(event, handlers = snapshot.len(), "raising event");
        let mut first_error: Option<Error> = None;
        for (_, handler) in snapshot.iter() {
            if let Err(e) = handler.call(args) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(snapshot.len())
        }
    }

    pub fn clear(&self) {
        lock(&self.handlers).clear();
    }
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let handlers = lock(&self.handlers);
        f.debug_map()
            .entries(handlers.iter().map(|(k, v)| (k, v.len())))
            .finish()
    }
}
