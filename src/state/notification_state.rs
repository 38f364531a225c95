// ============================================================================
// NOTIFICATION CHANNEL - single-slot, self-clearing status message
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::models::{Notification, NotificationKind};
use crate::services::timer::{Scheduler, TimerHandle};
use crate::state::reactivity::ChangeNotifier;

#[derive(Default)]
struct Slot {
    current: Option<Notification>,
    /// Bumped on every notify/clear; an expiry only applies to its own generation
    generation: u64,
    expiry: Option<TimerHandle>,
}

/// Process-wide notification slot. Latest notification wins.
#[derive(Clone)]
pub struct NotificationChannel {
    slot: Rc<RefCell<Slot>>,
    scheduler: Rc<dyn Scheduler>,
    timeout_ms: u32,
    changes: ChangeNotifier,
}

impl NotificationChannel {
    pub fn new(scheduler: Rc<dyn Scheduler>, timeout_ms: u32, changes: ChangeNotifier) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Slot::default())),
            scheduler,
            timeout_ms,
            changes,
        }
    }

    /// Replace the current notification and (re)start its expiry timer.
    pub fn notify(&self, text: impl Into<String>, kind: NotificationKind) {
        let notification = Notification::new(text, kind);
        match kind {
            NotificationKind::Error => log::error!("❌ {}", notification.text),
            NotificationKind::Success => log::info!("✅ {}", notification.text),
            NotificationKind::Info => log::info!("ℹ️ {}", notification.text),
        }

        let generation = {
            let mut slot = self.slot.borrow_mut();
            slot.generation += 1;
            slot.current = Some(notification);
            // Drops (and so cancels) the previous expiry
            slot.expiry = None;
            slot.generation
        };

        let weak = Rc::downgrade(&self.slot);
        let changes = self.changes.clone();
        let handle = self.scheduler.schedule(
            self.timeout_ms,
            Box::new(move || {
                let Some(slot) = weak.upgrade() else {
                    return;
                };
                // The handle stays in the slot: it is dropped by the next
                // notify/clear, never from inside its own callback.
                let expired = {
                    let mut slot = slot.borrow_mut();
                    slot.generation == generation && slot.current.take().is_some()
                };
                if expired {
                    changes.notify();
                }
            }),
        );

        {
            let mut slot = self.slot.borrow_mut();
            if slot.generation == generation {
                slot.expiry = Some(handle);
            }
        }
        self.changes.notify();
    }

    pub fn info(&self, text: impl Into<String>) {
        self.notify(text, NotificationKind::Info);
    }

    pub fn success(&self, text: impl Into<String>) {
        self.notify(text, NotificationKind::Success);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.notify(text, NotificationKind::Error);
    }

    /// Remove the notification now and cancel its pending expiry.
    pub fn clear(&self) {
        let had_notification = {
            let mut slot = self.slot.borrow_mut();
            slot.generation += 1;
            slot.expiry = None;
            slot.current.take().is_some()
        };
        if had_notification {
            self.changes.notify();
        }
    }

    pub fn current(&self) -> Option<Notification> {
        self.slot.borrow().current.clone()
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::timer::ManualScheduler;
    use std::cell::Cell;

    fn channel(timeout_ms: u32) -> (NotificationChannel, Rc<ManualScheduler>, ChangeNotifier) {
        let scheduler = Rc::new(ManualScheduler::new());
        let changes = ChangeNotifier::new();
        let channel = NotificationChannel::new(scheduler.clone(), timeout_ms, changes.clone());
        (channel, scheduler, changes)
    }

    #[test]
    fn notification_expires_after_timeout() {
        let (channel, clock, _) = channel(5_000);
        channel.success("Saved");
        assert_eq!(
            channel.current(),
            Some(Notification::new("Saved", NotificationKind::Success))
        );

        clock.advance(4_999);
        assert!(channel.current().is_some());
        clock.advance(1);
        assert_eq!(channel.current(), None);
    }

    #[test]
    fn newer_notification_reschedules_expiry() {
        let (channel, clock, _) = channel(5_000);
        channel.info("first");
        clock.advance(3_000);
        channel.error("second");

        // The first timer would have fired here
        clock.advance(2_500);
        assert_eq!(channel.current().map(|n| n.text), Some("second".to_string()));
        assert_eq!(clock.pending(), 1);

        clock.advance(2_500);
        assert_eq!(channel.current(), None);
    }

    #[test]
    fn clear_cancels_pending_expiry() {
        let (channel, clock, _) = channel(5_000);
        channel.info("bye");
        channel.clear();
        assert_eq!(channel.current(), None);
        assert_eq!(clock.pending(), 0);

        channel.info("again");
        clock.advance(5_000);
        assert_eq!(channel.current(), None);
    }

    #[test]
    fn every_visible_change_is_announced() {
        let (channel, clock, changes) = channel(100);
        let renders = Rc::new(Cell::new(0));
        let counter = renders.clone();
        changes.subscribe(move || counter.set(counter.get() + 1));

        channel.info("one");
        clock.advance(100);
        channel.clear();
        assert_eq!(renders.get(), 2, "show + expire; clearing an empty slot is silent");
    }
}
