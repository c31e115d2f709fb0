//! Process-wide ordered queues of active declarations.
//!
//! The registry is mutated only through [`Registry::add_to_queue`],
//! [`Registry::remove_from_queue`] and [`Registry::change`]. All three are
//! total: they never fail and never panic on unknown entries. Every mutation is
//! forwarded to the attached [`Applier`], if any.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::applier::Applier;
use crate::link::Link;
use crate::meta::{MetaOptions, MetaRecord};
use crate::platform::EnvironmentProbe;
use crate::render::HeadSnapshot;

/// Resource kinds. Each kind is an independent stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Title,
    TitleTemplate,
    Meta,
    Link,
    Lang,
}

impl Kind {
    pub const ALL: [Kind; 5] = [
        Kind::Title,
        Kind::TitleTemplate,
        Kind::Meta,
        Kind::Link,
        Kind::Lang,
    ];

    fn index(self) -> usize {
        match self {
            Kind::Title => 0,
            Kind::TitleTemplate => 1,
            Kind::Meta => 2,
            Kind::Link => 3,
            Kind::Lang => 4,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Title => "title",
            Kind::TitleTemplate => "title template",
            Kind::Meta => "meta",
            Kind::Link => "link",
            Kind::Lang => "lang",
        };
        f.write_str(name)
    }
}

/// A value some component wants applied.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Declaration {
    Title(String),
    TitleTemplate(String),
    Meta(MetaRecord),
    Link(Link),
    Lang(String),
}

impl Declaration {
    pub fn title(title: impl Into<String>) -> Self {
        Declaration::Title(title.into())
    }

    pub fn title_template(template: impl Into<String>) -> Self {
        Declaration::TitleTemplate(template.into())
    }

    pub fn lang(lang: impl Into<String>) -> Self {
        Declaration::Lang(lang.into())
    }

    pub fn kind(&self) -> Kind {
        match self {
            Declaration::Title(_) => Kind::Title,
            Declaration::TitleTemplate(_) => Kind::TitleTemplate,
            Declaration::Meta(_) => Kind::Meta,
            Declaration::Link(_) => Kind::Link,
            Declaration::Lang(_) => Kind::Lang,
        }
    }
}

impl From<MetaRecord> for Declaration {
    fn from(record: MetaRecord) -> Self {
        Declaration::Meta(record)
    }
}

impl From<MetaOptions> for Declaration {
    fn from(options: MetaOptions) -> Self {
        Declaration::Meta(MetaRecord::normalize(&options))
    }
}

impl From<Link> for Declaration {
    fn from(link: Link) -> Self {
        Declaration::Link(link)
    }
}

/// Handle to one registry entry. Stable across in-place changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    id: EntryId,
    declaration: Declaration,
}

impl Entry {
    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn declaration(&self) -> &Declaration {
        &self.declaration
    }
}

/// A net mutation as seen by the applier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueueChange {
    Added {
        id: EntryId,
        declaration: Declaration,
    },
    Removed {
        id: EntryId,
        declaration: Declaration,
    },
    Changed {
        id: EntryId,
        old: Declaration,
        new: Declaration,
    },
}

impl QueueChange {
    pub fn kind(&self) -> Kind {
        match self {
            QueueChange::Added { declaration, .. } | QueueChange::Removed { declaration, .. } => {
                declaration.kind()
            }
            QueueChange::Changed { new, .. } => new.kind(),
        }
    }

    pub fn id(&self) -> EntryId {
        match self {
            QueueChange::Added { id, .. }
            | QueueChange::Removed { id, .. }
            | QueueChange::Changed { id, .. } => *id,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Queues {
    lists: [Vec<Entry>; 5],
}

impl Queues {
    pub(crate) fn list(&self, kind: Kind) -> &[Entry] {
        &self.lists[kind.index()]
    }

    fn list_mut(&mut self, kind: Kind) -> &mut Vec<Entry> {
        &mut self.lists[kind.index()]
    }

    fn position(&self, kind: Kind, id: EntryId) -> Option<usize> {
        self.list(kind).iter().position(|entry| entry.id == id)
    }

    fn clear(&mut self) {
        for list in &mut self.lists {
            list.clear();
        }
    }
}

pub struct RegistryConfig {
    /// Placeholder replaced by the current title inside a title template.
    pub title_placeholder: String,
    /// Overrides environment detection. When unset, the environment counts as
    /// available exactly while an applier is attached.
    pub environment: Option<Rc<dyn EnvironmentProbe>>,
}

impl RegistryConfig {
    pub fn with_title_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.title_placeholder = placeholder.into();
        self
    }

    pub fn with_environment(mut self, probe: impl EnvironmentProbe + 'static) -> Self {
        self.environment = Some(Rc::new(probe));
        self
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            title_placeholder: "%s".to_owned(),
            environment: None,
        }
    }
}

impl fmt::Debug for RegistryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryConfig")
            .field("title_placeholder", &self.title_placeholder)
            .field("environment", &self.environment.is_some())
            .finish()
    }
}

struct RegistryInner {
    config: RegistryConfig,
    queues: Queues,
    next_id: u64,
    applier: Option<Box<dyn Applier>>,
    // Set while the applier is taken out to run outside the borrow.
    dispatching: bool,
    pending: Vec<QueueChange>,
    stale_changes: usize,
}

impl RegistryInner {
    fn allocate_id(&mut self) -> EntryId {
        self.next_id += 1;
        EntryId(self.next_id)
    }

    fn connected(&self) -> bool {
        self.applier.is_some() || self.dispatching
    }

    fn push(&mut self, declaration: Declaration) -> EntryId {
        let id = self.allocate_id();
        let kind = declaration.kind();
        if self.connected() {
            self.pending.push(QueueChange::Added {
                id,
                declaration: declaration.clone(),
            });
        }
        self.queues.list_mut(kind).push(Entry { id, declaration });
        log::debug!("queued {kind} {id}");
        id
    }

    fn remove(&mut self, kind: Kind, id: EntryId) -> bool {
        let Some(index) = self.queues.position(kind, id) else {
            log::debug!("{kind} {id} already withdrawn");
            return false;
        };
        let entry = self.queues.list_mut(kind).remove(index);
        log::debug!("withdrew {kind} {id}");
        if self.connected() {
            self.pending.push(QueueChange::Removed {
                id,
                declaration: entry.declaration,
            });
        }
        true
    }

    fn change(&mut self, kind: Kind, old: EntryId, declaration: Declaration) -> EntryId {
        let new_kind = declaration.kind();
        if new_kind != kind {
            log::warn!("change of {kind} {old} to a {new_kind} declaration; replacing");
            self.remove(kind, old);
            return self.push(declaration);
        }

        let Some(index) = self.queues.position(kind, old) else {
            self.stale_changes += 1;
            log::warn!("change target {kind} {old} not queued; adding instead");
            return self.push(declaration);
        };

        let connected = self.connected();
        let entry = &mut self.queues.list_mut(kind)[index];
        if entry.declaration == declaration {
            return old;
        }
        let new = connected.then(|| declaration.clone());
        let previous = std::mem::replace(&mut entry.declaration, declaration);
        log::debug!("changed {kind} {old}");
        if let Some(new) = new {
            self.pending.push(QueueChange::Changed {
                id: old,
                old: previous,
                new,
            });
        }
        old
    }
}

/// Shared handle to the declaration queues.
///
/// Cloning is cheap and every clone refers to the same queues. The registry is
/// single-threaded: it lives on the thread that drives the host UI.
#[derive(Clone)]
pub struct Registry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(RegistryInner {
                config,
                queues: Queues::default(),
                next_id: 0,
                applier: None,
                dispatching: false,
                pending: Vec::new(),
                stale_changes: 0,
            })),
        }
    }

    /// Connects the live environment.
    ///
    /// Entries queued before the environment existed are replayed to the new
    /// applier as additions, in queue order, followed by one flush.
    pub fn attach_applier(&self, applier: impl Applier + 'static) {
        {
            let mut inner = self.inner.borrow_mut();
            let replay: Vec<QueueChange> = Kind::ALL
                .iter()
                .flat_map(|kind| inner.queues.list(*kind))
                .map(|entry| QueueChange::Added {
                    id: entry.id,
                    declaration: entry.declaration.clone(),
                })
                .collect();
            let queued = std::mem::replace(&mut inner.pending, replay);
            inner.pending.extend(queued);
            if inner.applier.replace(Box::new(applier)).is_some() {
                log::warn!("replaced an attached applier");
            }
        }
        self.dispatch(true);
    }

    pub fn detach_applier(&self) -> Option<Box<dyn Applier>> {
        let mut inner = self.inner.borrow_mut();
        inner.pending.clear();
        inner.applier.take()
    }

    pub fn has_applier(&self) -> bool {
        self.inner.borrow().connected()
    }

    pub fn environment_available(&self) -> bool {
        let inner = self.inner.borrow();
        match &inner.config.environment {
            Some(probe) => probe.is_available(),
            None => inner.connected(),
        }
    }

    /// Appends a declaration to its kind's queue.
    pub fn add_to_queue(&self, declaration: Declaration) -> EntryId {
        let id = self.inner.borrow_mut().push(declaration);
        self.dispatch(false);
        id
    }

    /// Removes an entry. Unknown ids are ignored.
    pub fn remove_from_queue(&self, kind: Kind, id: EntryId) {
        self.inner.borrow_mut().remove(kind, id);
        self.dispatch(false);
    }

    /// Replaces an entry in place, keeping its position and id.
    ///
    /// When `old` is no longer queued the new declaration is appended instead,
    /// so a declared value is never dropped. That fallback usually means a
    /// caller held a stale handle; it is logged and counted in
    /// [`Registry::stale_changes`].
    pub fn change(&self, kind: Kind, old: EntryId, declaration: Declaration) -> EntryId {
        let id = self.inner.borrow_mut().change(kind, old, declaration);
        self.dispatch(false);
        id
    }

    /// Hands pending changes to the applier, then flushes the resolved head.
    ///
    /// The applier runs with the registry unborrowed, so it may read or mutate
    /// the registry. Mutations it makes are delivered after the current batch.
    fn dispatch(&self, always_flush: bool) {
        let mut applier = {
            let mut inner = self.inner.borrow_mut();
            if inner.dispatching || (inner.pending.is_empty() && !always_flush) {
                return;
            }
            let Some(applier) = inner.applier.take() else {
                inner.pending.clear();
                return;
            };
            inner.dispatching = true;
            applier
        };

        let mut flush = always_flush;
        loop {
            let changes = std::mem::take(&mut self.inner.borrow_mut().pending);
            if changes.is_empty() && !flush {
                break;
            }
            flush = false;
            for change in &changes {
                if let Err(err) = applier.apply(change) {
                    log::error!("applier failed on {} {}: {err}", change.kind(), change.id());
                }
            }
            let head = self.snapshot();
            if let Err(err) = applier.flush(&head) {
                log::error!("applier flush failed: {err}");
            }
        }

        let mut inner = self.inner.borrow_mut();
        inner.dispatching = false;
        if inner.applier.is_none() {
            inner.applier = Some(applier);
        } else {
            log::warn!("applier attached during dispatch; dropping the previous one");
        }
    }

    pub fn len(&self, kind: Kind) -> usize {
        self.inner.borrow().queues.list(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        let inner = self.inner.borrow();
        Kind::ALL
            .iter()
            .all(|kind| inner.queues.list(*kind).is_empty())
    }

    pub fn entries(&self, kind: Kind) -> Vec<Entry> {
        self.inner.borrow().queues.list(kind).to_vec()
    }

    pub fn contains(&self, kind: Kind, id: EntryId) -> bool {
        self.inner.borrow().queues.position(kind, id).is_some()
    }

    /// Number of `change` calls that fell back to an add.
    pub fn stale_changes(&self) -> usize {
        self.inner.borrow().stale_changes
    }

    /// Resolves the queues into the effective head without consuming them.
    pub fn snapshot(&self) -> HeadSnapshot {
        let inner = self.inner.borrow();
        HeadSnapshot::resolve(&inner.queues, &inner.config.title_placeholder)
    }

    /// Resolves the queues and empties them, for per-request server rendering.
    ///
    /// The attached applier, if any, is not told about the cleared entries.
    pub fn take_snapshot(&self) -> HeadSnapshot {
        let mut inner = self.inner.borrow_mut();
        let head = HeadSnapshot::resolve(&inner.queues, &inner.config.title_placeholder);
        inner.queues.clear();
        head
    }

    /// Renders the resolved head as HTML.
    pub fn to_html(&self) -> String {
        self.snapshot().to_html()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        let mut debug = f.debug_struct("Registry");
        for kind in Kind::ALL {
            debug.field(&kind.to_string(), &inner.queues.list(kind).len());
        }
        debug
            .field("applier", &inner.connected())
            .field("stale_changes", &inner.stale_changes)
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
