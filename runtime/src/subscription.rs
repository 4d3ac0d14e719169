//! Listener registry and RAII subscription handles.
//!
//! Listeners are called in registration order. A [`Subscription`] removes
//! its listener when dropped unless it has been detached.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Shared listener callback
pub(crate) type Listener<S> = Rc<dyn Fn(&S)>;

/// Ordered set of listeners keyed by subscription id
pub(crate) struct ListenerRegistry<S> {
    next_id: u64,
    listeners: Vec<(u64, Listener<S>)>,
}

impl<S> ListenerRegistry<S> {
    pub(crate) const fn new() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, listener: Listener<S>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: u64) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Clone the listener list so callbacks run without the registry borrowed
    pub(crate) fn snapshot(&self) -> Vec<Listener<S>> {
        self.listeners.iter().map(|(_, l)| Rc::clone(l)).collect()
    }
}

/// Object-safe view of a registry, so a handle does not carry the state type
pub(crate) trait Unsubscribe {
    fn unsubscribe(&self, id: u64) -> bool;
}

impl<S> Unsubscribe for RefCell<ListenerRegistry<S>> {
    fn unsubscribe(&self, id: u64) -> bool {
        // A failed borrow only happens while the registry itself is being
        // mutated, which never calls back into user code.
        self.try_borrow_mut().is_ok_and(|mut registry| registry.remove(id))
    }
}

/// Handle returned by `Store::subscribe`
///
/// Dropping the handle stops notifications. Call [`Subscription::detach`] to
/// keep the listener for as long as the store lives.
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    registry: Option<Weak<dyn Unsubscribe>>,
}

impl Subscription {
    pub(crate) fn new(id: u64, registry: Weak<dyn Unsubscribe>) -> Self {
        Self {
            id,
            registry: Some(registry),
        }
    }

    /// Identifier of this subscription within its store
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Keep the listener registered for the lifetime of the store
    pub fn detach(mut self) {
        self.registry = None;
    }

    /// Stop notifications now
    ///
    /// Returns false if the store was already gone.
    pub fn unsubscribe(mut self) -> bool {
        self.release()
    }

    fn release(&mut self) -> bool {
        self.registry
            .take()
            .and_then(|weak| weak.upgrade())
            .is_some_and(|registry| registry.unsubscribe(self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("attached", &self.registry.is_some())
            .finish()
    }
}
