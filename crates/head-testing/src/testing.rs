use std::cell::{Cell, RefCell};
use std::rc::Rc;

use head_core::{
    Applier, ApplyError, HeadObject, HeadScope, HeadSnapshot, Kind, QueueChange, Registry,
};
use indexmap::IndexMap;

/// Shared log of the changes a [`RecordingApplier`] received.
#[derive(Clone, Default)]
pub struct ChangeLog {
    changes: Rc<RefCell<Vec<QueueChange>>>,
    flushes: Rc<Cell<usize>>,
    head: Rc<RefCell<HeadSnapshot>>,
}

impl ChangeLog {
    /// Drains the recorded changes.
    pub fn take(&self) -> Vec<QueueChange> {
        std::mem::take(&mut *self.changes.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.changes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.borrow().is_empty()
    }

    /// Number of recorded changes of `kind`.
    pub fn count(&self, kind: Kind) -> usize {
        self.changes
            .borrow()
            .iter()
            .filter(|change| change.kind() == kind)
            .count()
    }

    pub fn flushes(&self) -> usize {
        self.flushes.get()
    }

    /// Head passed to the most recent flush.
    pub fn head(&self) -> HeadSnapshot {
        self.head.borrow().clone()
    }
}

/// Applier that records every change into a [`ChangeLog`].
pub struct RecordingApplier {
    log: ChangeLog,
}

impl RecordingApplier {
    pub fn with_log() -> (Self, ChangeLog) {
        let log = ChangeLog::default();
        (Self { log: log.clone() }, log)
    }
}

impl Applier for RecordingApplier {
    fn apply(&mut self, change: &QueueChange) -> Result<(), ApplyError> {
        self.log.changes.borrow_mut().push(change.clone());
        Ok(())
    }

    fn flush(&mut self, head: &HeadSnapshot) -> Result<(), ApplyError> {
        self.log.flushes.set(self.log.flushes.get() + 1);
        *self.log.head.borrow_mut() = head.clone();
        Ok(())
    }
}

/// Drives a set of component scopes the way a host framework would.
///
/// Components are addressed by a caller-chosen key. Each call runs the render
/// and commit phases for one component; unmounting drops its scope.
pub struct TestHost {
    registry: Registry,
    log: Option<ChangeLog>,
    components: IndexMap<String, HeadScope>,
}

impl TestHost {
    /// A host whose environment exists: a recording applier is attached.
    pub fn client() -> Self {
        let registry = Registry::new();
        let (applier, log) = RecordingApplier::with_log();
        registry.attach_applier(applier);
        log.take();
        Self {
            registry,
            log: Some(log),
            components: IndexMap::new(),
        }
    }

    /// A host rendering without an environment, as on a server.
    pub fn server() -> Self {
        Self {
            registry: Registry::new(),
            log: None,
            components: IndexMap::new(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Change log of the attached applier.
    ///
    /// Panics on a server host, which has no applier.
    pub fn log(&self) -> &ChangeLog {
        self.log
            .as_ref()
            .expect("server hosts have no applier attached")
    }

    /// Attaches a recording applier, turning a server host into a client one.
    pub fn hydrate(&mut self) -> ChangeLog {
        let (applier, log) = RecordingApplier::with_log();
        self.registry.attach_applier(applier);
        self.log = Some(log.clone());
        log
    }

    /// Render phase only. On a server host this queues the declarations.
    pub fn render(&mut self, key: &str, head: &HeadObject) {
        let registry = self.registry.clone();
        self.components
            .entry(key.to_owned())
            .or_insert_with(|| HeadScope::new(registry))
            .evaluate(head);
    }

    /// Commit phase for every rendered component, in render order.
    pub fn commit_all(&mut self) {
        for scope in self.components.values_mut() {
            scope.commit();
        }
    }

    /// Renders and commits one component, mounting it on first use.
    pub fn mount(&mut self, key: &str, head: &HeadObject) {
        self.render(key, head);
        if let Some(scope) = self.components.get_mut(key) {
            scope.commit();
        }
    }

    pub fn update(&mut self, key: &str, head: &HeadObject) {
        self.mount(key, head);
    }

    /// Unmounts one component. Returns false when it was not mounted.
    pub fn unmount(&mut self, key: &str) -> bool {
        self.components.shift_remove(key).is_some()
    }

    pub fn unmount_all(&mut self) {
        while self.components.pop().is_some() {}
    }

    pub fn scope(&self, key: &str) -> Option<&HeadScope> {
        self.components.get(key)
    }

    pub fn head(&self) -> HeadSnapshot {
        self.registry.snapshot()
    }
}
