use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::{Applier, ApplyError, HeadSnapshot, QueueChange, Registry};

/// Applier that keeps every change it sees; clones share the same log.
#[derive(Clone, Default)]
pub(crate) struct Recorder {
    log: Rc<RefCell<Vec<QueueChange>>>,
    flushes: Rc<Cell<usize>>,
    last_head: Rc<RefCell<HeadSnapshot>>,
}

impl Recorder {
    pub(crate) fn take(&self) -> Vec<QueueChange> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    pub(crate) fn len(&self) -> usize {
        self.log.borrow().len()
    }

    pub(crate) fn flushes(&self) -> usize {
        self.flushes.get()
    }

    pub(crate) fn last_head(&self) -> HeadSnapshot {
        self.last_head.borrow().clone()
    }
}

impl Applier for Recorder {
    fn apply(&mut self, change: &QueueChange) -> Result<(), ApplyError> {
        self.log.borrow_mut().push(change.clone());
        Ok(())
    }

    fn flush(&mut self, head: &HeadSnapshot) -> Result<(), ApplyError> {
        self.flushes.set(self.flushes.get() + 1);
        *self.last_head.borrow_mut() = head.clone();
        Ok(())
    }
}

pub(crate) fn recording_registry() -> (Registry, Recorder) {
    let registry = Registry::new();
    let recorder = Recorder::default();
    registry.attach_applier(recorder.clone());
    (registry, recorder)
}
