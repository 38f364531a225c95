// ============================================================================
// TIMER PORT - one-shot cancellable callbacks
// ============================================================================

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Pending timer. Dropping it cancels the callback if it has not fired.
pub struct TimerHandle(#[allow(dead_code)] Box<dyn Any>);

impl TimerHandle {
    pub fn new<T: 'static>(guard: T) -> Self {
        Self(Box::new(guard))
    }
}

pub trait Scheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerHandle;
}

/// Browser scheduler on top of `setTimeout`
#[cfg(target_arch = "wasm32")]
pub struct GlooScheduler;

#[cfg(target_arch = "wasm32")]
impl Scheduler for GlooScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerHandle {
        // gloo's Timeout clears the browser timer when dropped
        TimerHandle::new(gloo_timers::callback::Timeout::new(delay_ms, task))
    }
}

/// Deterministic scheduler driven by [`ManualScheduler::advance`].
///
/// Used wherever wall-clock timers are not available (native builds, tests).
#[derive(Default)]
pub struct ManualScheduler {
    state: RefCell<ManualState>,
}

#[derive(Default)]
struct ManualState {
    now_ms: u64,
    next_id: u64,
    pending: Vec<PendingTask>,
}

struct PendingTask {
    id: u64,
    due_ms: u64,
    cancelled: Rc<Cell<bool>>,
    task: Box<dyn FnOnce()>,
}

struct CancelOnDrop(Rc<Cell<bool>>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.set(true);
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.state.borrow().now_ms
    }

    /// Timers still waiting to fire (cancelled ones excluded)
    pub fn pending(&self) -> usize {
        self.state
            .borrow()
            .pending
            .iter()
            .filter(|task| !task.cancelled.get())
            .count()
    }

    /// Move the clock forward and run every live task that came due, in
    /// due order.
    pub fn advance(&self, ms: u64) {
        let target = self.state.borrow().now_ms + ms;
        loop {
            let next = {
                let mut state = self.state.borrow_mut();
                state.pending.retain(|task| !task.cancelled.get());
                let due = state
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, task)| task.due_ms <= target)
                    .min_by_key(|(_, task)| (task.due_ms, task.id))
                    .map(|(index, _)| index);
                match due {
                    Some(index) => {
                        let task = state.pending.remove(index);
                        state.now_ms = task.due_ms;
                        Some(task)
                    }
                    None => None,
                }
            };
            match next {
                // Task runs with no borrow held so it may schedule again
                Some(task) => (task.task)(),
                None => break,
            }
        }
        self.state.borrow_mut().now_ms = target;
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerHandle {
        let cancelled = Rc::new(Cell::new(false));
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = state.next_id;
        let due_ms = state.now_ms + u64::from(delay_ms);
        state.pending.push(PendingTask {
            id,
            due_ms,
            cancelled: cancelled.clone(),
            task,
        });
        TimerHandle::new(CancelOnDrop(cancelled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_only_once_due() {
        let scheduler = ManualScheduler::new();
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        let _handle = scheduler.schedule(100, Box::new(move || counter.set(counter.get() + 1)));

        scheduler.advance(99);
        assert_eq!(fired.get(), 0);
        scheduler.advance(1);
        assert_eq!(fired.get(), 1);
        scheduler.advance(1_000);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn dropping_the_handle_cancels() {
        let scheduler = ManualScheduler::new();
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        let handle = scheduler.schedule(10, Box::new(move || flag.set(true)));
        assert_eq!(scheduler.pending(), 1);

        drop(handle);
        assert_eq!(scheduler.pending(), 0);
        scheduler.advance(50);
        assert!(!fired.get());
    }
}
