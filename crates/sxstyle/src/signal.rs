//! Change notification shared by the viewport and theme providers.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Guard for a registered listener.
///
/// The listener is released exactly once: either by [`cancel`](Self::cancel)
/// or when the guard is dropped, whichever comes first.
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Creates a guard that runs `release` when it ends.
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Releases the listener now.
    pub fn cancel(mut self) {
        self.release_now();
    }

    /// Returns `true` until the listener has been released.
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

type Listener<T> = Rc<dyn Fn(&T)>;

struct ListenerSet<T> {
    next_id: u64,
    entries: Vec<(u64, Listener<T>)>,
}

/// A single-threaded list of listeners.
pub(crate) struct Listeners<T> {
    inner: Rc<RefCell<ListenerSet<T>>>,
}

impl<T: 'static> Listeners<T> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ListenerSet {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    pub(crate) fn subscribe(&self, listener: Listener<T>) -> Subscription {
        let id = {
            let mut set = self.inner.borrow_mut();
            let id = set.next_id;
            set.next_id += 1;
            set.entries.push((id, listener));
            id
        };

        let set = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(set) = set.upgrade() {
                set.borrow_mut().entries.retain(|(entry, _)| *entry != id);
            }
        })
    }

    /// Calls every listener registered at the time of the call.
    ///
    /// Listeners may subscribe or unsubscribe while being notified.
    pub(crate) fn notify(&self, value: &T) {
        let snapshot: Vec<Listener<T>> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(value);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }
}

impl<T> Clone for Listeners<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_subscription_releases_once() {
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let sub = Subscription::new(move || counter.set(counter.get() + 1));
        assert!(sub.is_active());
        sub.cancel();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_subscription_releases_on_drop() {
        let count = Rc::new(Cell::new(0));
        {
            let counter = Rc::clone(&count);
            let _sub = Subscription::new(move || counter.set(counter.get() + 1));
        }
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_listeners_notify_and_unsubscribe() {
        let listeners: Listeners<u32> = Listeners::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let sub = listeners.subscribe(Rc::new(move |v: &u32| sink.borrow_mut().push(*v)));
        listeners.notify(&1);
        assert_eq!(listeners.len(), 1);

        drop(sub);
        listeners.notify(&2);
        assert_eq!(listeners.len(), 0);
        assert_eq!(*seen.borrow(), vec![1]);
    }

    #[test]
    fn test_subscription_outliving_listeners() {
        let listeners: Listeners<u32> = Listeners::new();
        let sub = listeners.subscribe(Rc::new(|_: &u32| {}));
        drop(listeners);
        drop(sub);
    }
}
