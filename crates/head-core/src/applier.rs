//! The surface the registry drives the live environment through.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::collections::ordered::IndexMap;
use crate::link::Link;
use crate::meta::{MetaInstance, MetaRecord};
use crate::registry::{Kind, QueueChange};
use crate::render::HeadSnapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    Unavailable,
    Rejected { kind: Kind, reason: String },
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyError::Unavailable => write!(f, "resource environment unavailable"),
            ApplyError::Rejected { kind, reason } => {
                write!(f, "{kind} declaration rejected: {reason}")
            }
        }
    }
}

impl std::error::Error for ApplyError {}

/// Receives every net registry mutation.
///
/// `apply` sees each queue operation of a registry call; `flush` follows with
/// the resolved head so implementations that only care about the final state
/// can ignore the individual operations. Both run with the registry unborrowed:
/// an applier may read it, and changes it makes arrive in a follow-up batch.
pub trait Applier {
    fn apply(&mut self, change: &QueueChange) -> Result<(), ApplyError>;

    fn flush(&mut self, _head: &HeadSnapshot) -> Result<(), ApplyError> {
        Ok(())
    }
}

/// Lets the host keep a handle on an applier the registry owns.
impl<A: Applier> Applier for Rc<RefCell<A>> {
    fn apply(&mut self, change: &QueueChange) -> Result<(), ApplyError> {
        self.borrow_mut().apply(change)
    }

    fn flush(&mut self, head: &HeadSnapshot) -> Result<(), ApplyError> {
        self.borrow_mut().flush(head)
    }
}

/// In-memory model of a live document head.
///
/// Writes only what differs from the previous flush and counts the element
/// writes it performed, which makes flicker observable in tests.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    lang: Option<String>,
    title: Option<String>,
    metas: IndexMap<MetaInstance, MetaRecord>,
    links: Vec<Link>,
    writes: usize,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn meta(&self, instance: &MetaInstance) -> Option<&MetaRecord> {
        self.metas.get(instance)
    }

    pub fn metas(&self) -> impl Iterator<Item = &MetaRecord> {
        self.metas.values()
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn writes(&self) -> usize {
        self.writes
    }

    fn sync_metas(&mut self, resolved: &[MetaRecord]) {
        let before = self.metas.len();
        self.metas
            .retain(|instance, _| resolved.iter().any(|m| &m.instance() == instance));
        self.writes += before - self.metas.len();

        for record in resolved {
            let instance = record.instance();
            if self.metas.get(&instance) != Some(record) {
                self.metas.insert(instance, record.clone());
                self.writes += 1;
            }
        }
    }
}

impl Applier for MemoryDocument {
    fn apply(&mut self, change: &QueueChange) -> Result<(), ApplyError> {
        log::trace!("document observed {change:?}");
        Ok(())
    }

    fn flush(&mut self, head: &HeadSnapshot) -> Result<(), ApplyError> {
        if self.title.as_deref() != head.title() {
            self.title = head.title().map(str::to_owned);
            self.writes += 1;
        }
        if self.lang.as_deref() != head.lang() {
            self.lang = head.lang().map(str::to_owned);
            self.writes += 1;
        }
        self.sync_metas(head.metas());
        if self.links != head.links() {
            self.links = head.links().to_vec();
            self.writes += 1;
        }
        Ok(())
    }
}
