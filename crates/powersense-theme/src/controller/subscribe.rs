//! Preference subscriptions.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::preference::ThemePreference;

type Callback = Box<dyn FnMut(ThemePreference)>;

struct Listener {
    active: Rc<Cell<bool>>,
    callback: Callback,
}

/// Active listeners, notified in registration order.
#[derive(Default)]
pub(crate) struct Listeners {
    entries: Vec<Listener>,
}

impl Listeners {
    /// Registers a listener and delivers `current` to it immediately.
    pub(crate) fn register(&mut self, mut callback: Callback, current: ThemePreference) -> Subscription {
        callback(current);
        let active = Rc::new(Cell::new(true));
        self.entries.push(Listener {
            active: Rc::clone(&active),
            callback,
        });
        Subscription {
            active,
            detached: false,
        }
    }

    pub(crate) fn notify(&mut self, pref: ThemePreference) {
        self.entries.retain(|l| l.active.get());
        for listener in &mut self.entries {
            // A callback may revoke a later subscription.
            if listener.active.get() {
                (listener.callback)(pref);
            }
        }
    }

    pub(crate) fn active(&self) -> usize {
        self.entries.iter().filter(|l| l.active.get()).count()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("active", &self.active())
            .finish()
    }
}

/// Handle to a registered listener.
///
/// Dropping the handle (or calling [`unsubscribe`](Self::unsubscribe))
/// revokes the listener; it receives nothing afterwards.
#[derive(Debug)]
#[must_use = "dropping a Subscription immediately revokes it"]
pub struct Subscription {
    active: Rc<Cell<bool>>,
    detached: bool,
}

impl Subscription {
    pub fn unsubscribe(self) {}

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Keeps the listener registered for the controller's whole lifetime.
    pub fn detach(mut self) {
        self.detached = true;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if !self.detached {
            self.active.set(false);
        }
    }
}

/// A buffered sequence of preference values.
///
/// Starts with the value at subscription time and then receives one value per
/// commit. Iterating drains what has been delivered so far without blocking.
/// Closing (or dropping) the stream revokes it; values delivered before that
/// stay readable.
#[derive(Debug)]
pub struct PreferenceStream {
    buffer: Rc<RefCell<VecDeque<ThemePreference>>>,
    subscription: Option<Subscription>,
}

impl PreferenceStream {
    pub(crate) fn attach(listeners: &mut Listeners, current: ThemePreference) -> Self {
        let buffer = Rc::new(RefCell::new(VecDeque::new()));
        let sink = Rc::clone(&buffer);
        let subscription = listeners.register(
            Box::new(move |pref| sink.borrow_mut().push_back(pref)),
            current,
        );
        Self {
            buffer,
            subscription: Some(subscription),
        }
    }

    pub fn close(&mut self) {
        self.subscription.take();
    }

    pub fn is_closed(&self) -> bool {
        self.subscription.is_none()
    }

    /// Number of delivered values not yet read.
    pub fn pending(&self) -> usize {
        self.buffer.borrow().len()
    }
}

impl Iterator for PreferenceStream {
    type Item = ThemePreference;

    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.borrow_mut().pop_front()
    }
}
