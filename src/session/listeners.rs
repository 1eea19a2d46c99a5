use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::trace;

use super::SessionState;

type Listener = Rc<RefCell<dyn FnMut(&SessionState)>>;

/// Live listeners, ordered by id. Ids are never reused.
#[derive(Default)]
struct Entries {
    next_id: u64,
    live: Vec<(u64, Listener)>,
}

/// Observer registry owned by a `NavigationSession`.
///
/// Each listener is keyed by a monotonically increasing id, so the list stays
/// sorted in subscription order and holds only live listeners. A
/// [`Subscription`] removes its entry by id.
pub(crate) struct ListenerRegistry {
    entries: Rc<RefCell<Entries>>,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: Rc::new(RefCell::new(Entries::default())),
        }
    }

    pub(crate) fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&SessionState) + 'static,
    {
        let listener: Listener = Rc::new(RefCell::new(listener));
        let mut entries = self.entries.borrow_mut();
        let id = entries.next_id;
        entries.next_id += 1;
        entries.live.push((id, listener));
        Subscription {
            entries: Rc::downgrade(&self.entries),
            id,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().live.len()
    }

    /// Call every live listener in subscription order.
    ///
    /// The live set is captured before the first call, so unsubscribing from
    /// inside a listener only takes effect on the next notification.
    pub(crate) fn notify(&self, state: &SessionState) {
        let live: Vec<Listener> = self
            .entries
            .borrow()
            .live
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        trace!(listeners = live.len(), "Notifying session listeners");
        for listener in live {
            (&mut *listener.borrow_mut())(state);
        }
    }
}

/// Handle returned by `NavigationSession::subscribe`.
///
/// Dropping the handle keeps the listener registered; call
/// [`Subscription::unsubscribe`] to remove it.
#[derive(Debug)]
pub struct Subscription {
    entries: Weak<RefCell<Entries>>,
    id: u64,
}

impl Subscription {
    /// Remove the listener. A no-op once the session is gone.
    pub fn unsubscribe(self) {
        let Some(entries) = self.entries.upgrade() else {
            return;
        };
        let mut entries = entries.borrow_mut();
        if let Ok(pos) = entries.live.binary_search_by_key(&self.id, |(id, _)| *id) {
            entries.live.remove(pos);
        }
    }
}
