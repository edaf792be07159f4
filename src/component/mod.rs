mod memo;
pub use memo::Memo;

mod scope;
pub use scope::Scope;

use crate::core::{Callback, TimeT, TimerService};
use crate::handle::{IntervalHandle, TimeoutHandle};
use std::rc::Rc;

/// Memo key for a handle factory: callback identity plus duration.
pub type HandleKey = (usize, TimeT);

/// Identity of a shared callback, by allocation address. Two clones of one
/// `Rc` share an identity; a freshly built closure gets a new one.
pub fn callback_key(callback: &Callback) -> usize {
    Rc::as_ptr(callback) as *const () as usize
}

/// Memoized [`TimeoutHandle`] factory for an owning component.
///
/// Returns the same handle for as long as the callback identity and
/// `duration_ms` are unchanged. When either changes the previous handle is
/// dropped first, cancelling its pending timer, and a fresh handle is built.
/// The new handle's `stop` is registered with `scope` as an unmount teardown.
pub fn timeout_handle(
    memo: &mut Memo<HandleKey, Rc<TimeoutHandle>>,
    scope: &mut Scope,
    service: &TimerService,
    callback: &Callback,
    duration_ms: TimeT,
) -> Rc<TimeoutHandle> {
    let key = (callback_key(callback), duration_ms);
    // Cancel the stale handle before the rebuild drops it from the memo; the
    // caller may still hold clones that keep the old handle alive.
    if !memo.matches(&key) {
        if let Some(stale) = memo.get() {
            stale.stop();
        }
    }
    memo.get_or_rebuild(key, || {
        let handle = Rc::new(TimeoutHandle::new(service, callback.clone(), duration_ms));
        // Held weakly so a handle replaced by a later rebuild can still be
        // dropped (and cancelled) eagerly.
        let weak = Rc::downgrade(&handle);
        scope.on_unmount(move || {
            if let Some(handle) = weak.upgrade() {
                handle.stop();
            }
        });
        handle
    })
    .clone()
}

/// Memoized [`IntervalHandle`] factory; same contract as [`timeout_handle`].
pub fn interval_handle(
    memo: &mut Memo<HandleKey, Rc<IntervalHandle>>,
    scope: &mut Scope,
    service: &TimerService,
    callback: &Callback,
    period_ms: TimeT,
) -> Rc<IntervalHandle> {
    let key = (callback_key(callback), period_ms);
    if !memo.matches(&key) {
        if let Some(stale) = memo.get() {
            stale.stop();
        }
    }
    memo.get_or_rebuild(key, || {
        let handle = Rc::new(IntervalHandle::new(service, callback.clone(), period_ms));
        let weak = Rc::downgrade(&handle);
        scope.on_unmount(move || {
            if let Some(handle) = weak.upgrade() {
                handle.stop();
            }
        });
        handle
    })
    .clone()
}
