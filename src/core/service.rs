use crate::core::{
    clock::{Clock, TimeT},
    store::Store,
    timer::TimerId,
    wheel::SHORT_WHEEL_RESOLUTION_MS,
};
use crate::utils::Logger;
use futures::{Stream, StreamExt};
use std::{cell::RefCell, collections::HashMap, pin::Pin, rc::Rc, sync::Arc};
use tokio::sync::{mpsc, oneshot};
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Shared callback invoked when a timer fires.
pub type Callback = Rc<dyn Fn()>;

/// Wake notifications for a driving event loop; ends on termination.
pub type WakeStream = Pin<Box<dyn Stream<Item = ()>>>;

struct Task {
    callback: Callback,
    /// `Some` re-arms the task after every fire.
    period: Option<TimeT>,
}

struct Inner {
    store: Store,
    tasks: HashMap<TimerId, Task>,
    wake_tx: mpsc::UnboundedSender<()>,
    wake_rx: Option<mpsc::UnboundedReceiver<()>>,
}

/// Single-threaded timer primitives: one-shot and repeating scheduled calls,
/// cancelable by id, with synchronous and effective cancellation.
///
/// Callbacks run during [`run_due`](Self::run_due) with no internal borrow
/// held, so a callback may call back into the service freely, including
/// clearing or superseding its own timer.
#[derive(Clone)]
pub struct TimerService {
    clock: Arc<dyn Clock>,
    logger: Arc<dyn Logger>,
    inner: Rc<RefCell<Inner>>,
}

impl TimerService {
    pub fn new(clock: Arc<dyn Clock>, logger: Arc<dyn Logger>) -> Self {
        let (wake_tx, wake_rx) = mpsc::unbounded_channel();
        let inner = Inner {
            store: Store::new(clock.clone()),
            tasks: HashMap::new(),
            wake_tx,
            wake_rx: Some(wake_rx),
        };
        Self {
            clock,
            logger,
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    /// Schedule `callback` to run once after `delay_ms`.
    pub fn set_timeout(&self, callback: Callback, delay_ms: TimeT) -> TimerId {
        self.arm(callback, delay_ms, None)
    }

    /// Cancel a pending one-shot timer. Unknown or already-fired ids are a
    /// logged no-op.
    pub fn clear_timeout(&self, id: &TimerId) {
        self.clear(id);
    }

    /// Schedule `callback` to run every `period_ms` until cleared.
    pub fn set_interval(&self, callback: Callback, period_ms: TimeT) -> TimerId {
        self.arm(callback, period_ms, Some(period_ms))
    }

    /// Cancel a repeating timer and all of its future recurrences.
    pub fn clear_interval(&self, id: &TimerId) {
        self.clear(id);
    }

    /// Fire every timer due at the current clock reading. Returns the number
    /// of callbacks invoked.
    pub fn run_due(&self) -> usize {
        let due = self.inner.borrow_mut().store.drain_due();
        let mut fired = 0;

        for id in due {
            let callback = {
                let mut inner = self.inner.borrow_mut();
                match inner.tasks.get(&id).map(|task| task.period.is_some()) {
                    // Cleared between becoming due and firing, possibly by an
                    // earlier callback in this same pass.
                    None => None,
                    Some(true) => inner.tasks.get(&id).map(|task| task.callback.clone()),
                    // One-shot tasks are consumed before their callback runs.
                    Some(false) => inner.tasks.remove(&id).map(|task| task.callback),
                }
            };
            let Some(callback) = callback else { continue };

            callback();
            fired += 1;

            // Re-arm a repeating task unless its callback cleared it.
            let mut inner = self.inner.borrow_mut();
            if let Some(period) = inner.tasks.get(&id).and_then(|task| task.period) {
                let due = self.clock.now() + period;
                inner.store.schedule(id, due);
                let _ = inner.wake_tx.send(());
            }
        }

        fired
    }

    /// How long a driver may sleep before the next [`run_due`](Self::run_due)
    /// pass, padded by one wheel resolution so the due bucket has rolled past
    /// by the time the driver drains. `None` when nothing is scheduled.
    pub fn delay_until_due(&self) -> Option<TimeT> {
        let due = self.inner.borrow().store.next_due()?;
        Some(due.saturating_sub(self.clock.now()) + SHORT_WHEEL_RESOLUTION_MS)
    }

    /// Hand out the wake stream. It yields on every arm and re-arm and ends
    /// when `termination` fires; it can only be taken once.
    pub fn take_wakes(&self, termination: oneshot::Receiver<()>) -> Option<WakeStream> {
        let wakes = self.inner.borrow_mut().wake_rx.take()?;
        let stream = UnboundedReceiverStream::new(wakes);
        Some(Box::pin(stream.take_until(async move {
            let _ = termination.await;
        })))
    }

    fn arm(&self, callback: Callback, delay_ms: TimeT, period: Option<TimeT>) -> TimerId {
        let id = TimerId::new();
        let due = self.clock.now() + delay_ms;
        let mut inner = self.inner.borrow_mut();
        inner.store.schedule(id, due);
        inner.tasks.insert(id, Task { callback, period });
        let _ = inner.wake_tx.send(());
        id
    }

    fn clear(&self, id: &TimerId) {
        let mut inner = self.inner.borrow_mut();
        if inner.tasks.remove(id).is_none() {
            self.logger
                .debug(&format!("Clear of unknown or already fired timer {id}"));
            return;
        }
        inner.store.cancel(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::tests::FakeClock;
    use crate::utils::StdoutLogger;
    use std::cell::Cell;

    const GRAIN: TimeT = SHORT_WHEEL_RESOLUTION_MS;

    fn setup() -> (Arc<FakeClock>, TimerService) {
        let clock = Arc::new(FakeClock::new(0));
        let service = TimerService::new(clock.clone(), Arc::new(StdoutLogger::new()));
        (clock, service)
    }

    fn counter() -> (Callback, Rc<Cell<usize>>) {
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        let callback: Callback = Rc::new(move || seen.set(seen.get() + 1));
        (callback, count)
    }

    #[test]
    fn timeout_fires_once_and_is_consumed() {
        let (clock, service) = setup();
        let (callback, count) = counter();
        service.set_timeout(callback, 100);

        clock.advance(100 + GRAIN);
        assert_eq!(1, service.run_due());

        clock.advance(1_000);
        assert_eq!(0, service.run_due());
        assert_eq!(1, count.get());
    }

    #[test]
    fn zero_delay_fires_on_the_next_pass() {
        let (clock, service) = setup();
        let (callback, count) = counter();
        service.set_timeout(callback, 0);

        assert_eq!(0, count.get());
        clock.advance(GRAIN);
        service.run_due();
        assert_eq!(1, count.get());
    }

    #[test]
    fn cleared_timeout_never_fires() {
        let (clock, service) = setup();
        let (callback, count) = counter();
        let id = service.set_timeout(callback, 100);

        service.clear_timeout(&id);

        clock.advance(1_000);
        service.run_due();
        assert_eq!(0, count.get());
    }

    #[test]
    fn interval_rearms_after_every_fire() {
        let (clock, service) = setup();
        let (callback, count) = counter();
        service.set_interval(callback, 100);

        for _ in 0..3 {
            clock.advance(100 + GRAIN);
            service.run_due();
        }
        assert_eq!(3, count.get());
    }

    #[test]
    fn cleared_interval_stops_recurring() {
        let (clock, service) = setup();
        let (callback, count) = counter();
        let id = service.set_interval(callback, 100);

        clock.advance(100 + GRAIN);
        service.run_due();
        service.clear_interval(&id);

        clock.advance(1_000);
        service.run_due();
        assert_eq!(1, count.get());
    }

    #[test]
    fn interval_callback_can_clear_itself() {
        let (clock, service) = setup();
        let id_slot: Rc<Cell<Option<TimerId>>> = Rc::new(Cell::new(None));
        let count = Rc::new(Cell::new(0));

        let inner_service = service.clone();
        let inner_slot = id_slot.clone();
        let seen = count.clone();
        let callback: Callback = Rc::new(move || {
            seen.set(seen.get() + 1);
            if let Some(id) = inner_slot.get() {
                inner_service.clear_interval(&id);
            }
        });

        let id = service.set_interval(callback, 100);
        id_slot.set(Some(id));

        clock.advance(100 + GRAIN);
        service.run_due();

        clock.advance(1_000);
        service.run_due();
        assert_eq!(1, count.get());
    }

    #[test]
    fn clear_of_unknown_id_only_logs() {
        let clock = Arc::new(FakeClock::new(0));
        let logger = Arc::new(StdoutLogger::with_capture());
        let service = TimerService::new(clock, logger.clone());

        service.clear_timeout(&TimerId::new());
        assert!(logger.contains("unknown"));
    }

    #[test]
    fn delay_until_due_pads_by_one_resolution() {
        let (clock, service) = setup();
        assert_eq!(None, service.delay_until_due());

        let (callback, _count) = counter();
        service.set_timeout(callback, 100);
        assert_eq!(Some(100 + GRAIN), service.delay_until_due());

        clock.advance(40);
        assert_eq!(Some(60 + GRAIN), service.delay_until_due());
    }

    #[tokio::test]
    async fn wake_stream_yields_on_arm_and_ends_on_termination() {
        let (_clock, service) = setup();
        let (termination_tx, termination_rx) = oneshot::channel();
        let mut wakes = service
            .take_wakes(termination_rx)
            .expect("Expected a wake stream");
        assert!(service.take_wakes(oneshot::channel().1).is_none());

        let (callback, _count) = counter();
        service.set_timeout(callback, 100);

        assert_eq!(Some(()), wakes.next().await);
        let _ = termination_tx.send(());
        assert_eq!(None, wakes.next().await);
    }
}
