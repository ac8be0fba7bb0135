use std::any::Any;
use std::fmt;

/// Owned teardown for an attached controller.
///
/// Holds guards (listener handles, frame handles, timers, observers) and
/// explicit teardown actions. Disposal runs actions in reverse registration
/// order and then drops the guards, exactly once. Dropping a `Disposer`
/// disposes it.
#[derive(Default)]
pub struct Disposer {
    actions: Vec<Box<dyn FnOnce()>>,
    guards: Vec<Box<dyn Any>>,
    disposed: bool,
}

impl Disposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `guard` alive until disposal; its `Drop` is the teardown.
    pub fn hold<T: 'static>(&mut self, guard: T) {
        if self.disposed {
            return;
        }
        self.guards.push(Box::new(guard));
    }

    /// Run `action` on disposal.
    pub fn on_dispose(&mut self, action: impl FnOnce() + 'static) {
        if self.disposed {
            action();
            return;
        }
        self.actions.push(Box::new(action));
    }

    /// Absorb another disposer; it is disposed together with this one.
    pub fn adopt(&mut self, other: Disposer) {
        self.hold(other);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn len(&self) -> usize {
        self.actions.len() + self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        while let Some(action) = self.actions.pop() {
            action();
        }
        while let Some(guard) = self.guards.pop() {
            drop(guard);
        }
    }
}

impl Drop for Disposer {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer")
            .field("actions", &self.actions.len())
            .field("guards", &self.guards.len())
            .field("disposed", &self.disposed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Disposer;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Guard(&'static str, Rc<RefCell<Vec<&'static str>>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            self.1.borrow_mut().push(self.0);
        }
    }

    #[test]
    fn actions_run_in_reverse_order_once() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut d = Disposer::new();
        for name in ["a", "b", "c"] {
            let log = log.clone();
            d.on_dispose(move || log.borrow_mut().push(name));
        }
        d.dispose();
        d.dispose();
        assert_eq!(*log.borrow(), vec!["c", "b", "a"]);
        assert!(d.is_disposed());
    }

    #[test]
    fn drop_releases_guards() {
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let mut d = Disposer::new();
            d.hold(Guard("listener", log.clone()));
            d.hold(Guard("frame", log.clone()));
            assert_eq!(d.len(), 2);
        }
        assert_eq!(*log.borrow(), vec!["frame", "listener"]);
    }

    #[test]
    fn adopted_disposer_goes_with_parent() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut child = Disposer::new();
        child.hold(Guard("child", log.clone()));
        let mut parent = Disposer::new();
        parent.adopt(child);
        assert!(log.borrow().is_empty());
        parent.dispose();
        assert_eq!(*log.borrow(), vec!["child"]);
    }

    #[test]
    fn registering_after_dispose_runs_immediately() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut d = Disposer::new();
        d.dispose();
        let inner = log.clone();
        d.on_dispose(move || inner.borrow_mut().push("late"));
        d.hold(Guard("late-guard", log.clone()));
        assert_eq!(*log.borrow(), vec!["late", "late-guard"]);
        assert!(d.is_empty());
    }
}
