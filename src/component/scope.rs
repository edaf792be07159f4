/// Unmount scope for an owning component.
///
/// Teardowns registered here run exactly once, in registration order, when
/// the scope is dropped.
pub struct Scope {
    teardowns: Vec<Box<dyn FnOnce()>>,
}

impl Scope {
    pub fn new() -> Self {
        Self {
            teardowns: Vec::new(),
        }
    }

    /// Register a teardown to run at unmount.
    pub fn on_unmount(&mut self, teardown: impl FnOnce() + 'static) {
        self.teardowns.push(Box::new(teardown));
    }

    /// Destroy the scope, running every registered teardown.
    pub fn unmount(self) {}
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        for teardown in self.teardowns.drain(..) {
            teardown();
        }
    }
}
