// ============================================================================
// REACTIVITY - change subscribers that drive re-rendering
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

type Callback = Rc<dyn Fn()>;

/// Shared list of "something changed" callbacks.
///
/// Stores call [`ChangeNotifier::notify`] after every mutation, with no
/// `RefCell` borrow held, so a subscriber may read any store.
#[derive(Clone, Default)]
pub struct ChangeNotifier {
    subscribers: Rc<RefCell<Vec<Callback>>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.subscribers.borrow_mut().push(Rc::new(callback));
    }

    pub fn notify(&self) {
        // Snapshot first: a callback may subscribe while we iterate
        let callbacks: Vec<Callback> = self.subscribers.borrow().clone();
        for callback in callbacks {
            callback();
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}
