//! Per-component binding of declarations to the registry.
//!
//! A host framework drives each component instance through a scope:
//! [`HeadScope::evaluate`] during render, [`HeadScope::commit`] once the render
//! is committed, and [`HeadScope::dispose`] (or drop) on unmount. The scope
//! remembers which registry entries it owns and reconciles them on each commit.

use std::rc::Rc;

use crate::memo::Memo;
use crate::meta::{self, MetaOptions, MetaRecord};
use crate::reconcile::{reconcile, MetaOp};
use crate::registry::{Declaration, EntryId, Kind, Registry};

/// What a component declares for the head.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct HeadObject {
    pub title: Option<String>,
    pub metas: Option<Vec<MetaOptions>>,
}

impl HeadObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn meta(mut self, meta: MetaOptions) -> Self {
        self.metas.get_or_insert_with(Vec::new).push(meta);
        self
    }

    pub fn metas(mut self, metas: impl IntoIterator<Item = MetaOptions>) -> Self {
        self.metas = Some(metas.into_iter().collect());
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Unmounted,
    /// Declarations were queued during render because the environment did
    /// not exist yet.
    PreMountQueued,
    Mounted,
    Disposed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct TitleEntry {
    id: EntryId,
    value: String,
}

pub struct HeadScope {
    registry: Registry,
    lifecycle: Lifecycle,
    memo: Memo<Option<Vec<MetaOptions>>, Vec<MetaRecord>>,
    pending_title: Option<String>,
    pending_metas: Rc<Vec<MetaRecord>>,
    metas_dirty: bool,
    title: Option<TitleEntry>,
    // Records this scope contributed and the entries holding them, index-aligned.
    previous_metas: Rc<Vec<MetaRecord>>,
    added_metas: Vec<EntryId>,
}

impl HeadScope {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            lifecycle: Lifecycle::Unmounted,
            memo: Memo::new(),
            pending_title: None,
            pending_metas: Rc::new(Vec::new()),
            metas_dirty: false,
            title: None,
            previous_metas: Rc::new(Vec::new()),
            added_metas: Vec::new(),
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Title entry currently owned by this scope.
    pub fn title_entry(&self) -> Option<EntryId> {
        self.title.as_ref().map(|title| title.id)
    }

    /// Meta entries currently owned by this scope, in declaration order.
    pub fn meta_entries(&self) -> &[EntryId] {
        &self.added_metas
    }

    /// Render phase: record the latest declarations.
    ///
    /// The first evaluation of a scope whose environment does not exist yet
    /// queues everything immediately, so a server render can collect it.
    pub fn evaluate(&mut self, head: &HeadObject) {
        if self.lifecycle == Lifecycle::Disposed {
            log::warn!("evaluate called on a disposed head scope");
            return;
        }

        let (metas, recomputed) = self.memo.get_or_compute(&head.metas, |metas| {
            meta::normalize(metas.as_deref().unwrap_or_default())
        });
        if recomputed || !Rc::ptr_eq(&metas, &self.pending_metas) {
            self.metas_dirty = true;
        }
        self.pending_metas = metas;
        self.pending_title = head.title.clone();

        if self.lifecycle == Lifecycle::Unmounted && !self.registry.environment_available() {
            self.push_initial();
            self.lifecycle = Lifecycle::PreMountQueued;
        }
    }

    /// Commit phase: mount on the first commit, reconcile afterwards.
    pub fn commit(&mut self) {
        match self.lifecycle {
            Lifecycle::Disposed => return,
            Lifecycle::Unmounted => {
                self.push_initial();
                self.lifecycle = Lifecycle::Mounted;
                return;
            }
            Lifecycle::PreMountQueued => self.lifecycle = Lifecycle::Mounted,
            Lifecycle::Mounted => {}
        }

        if self.metas_dirty {
            self.sync_metas();
        }
        self.sync_title();
    }

    /// Unmount: withdraw everything this scope contributed.
    pub fn dispose(&mut self) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }
        for id in self.added_metas.drain(..) {
            self.registry.remove_from_queue(Kind::Meta, id);
        }
        self.previous_metas = Rc::new(Vec::new());
        if let Some(title) = self.title.take() {
            self.registry.remove_from_queue(Kind::Title, title.id);
        }
        self.lifecycle = Lifecycle::Disposed;
    }

    fn push_initial(&mut self) {
        if let Some(title) = &self.pending_title {
            let id = self.registry.add_to_queue(Declaration::Title(title.clone()));
            self.title = Some(TitleEntry {
                id,
                value: title.clone(),
            });
        }
        self.added_metas = self
            .pending_metas
            .iter()
            .map(|record| self.registry.add_to_queue(Declaration::Meta(record.clone())))
            .collect();
        self.previous_metas = Rc::clone(&self.pending_metas);
        self.metas_dirty = false;
    }

    fn sync_metas(&mut self) {
        let previous = Rc::clone(&self.previous_metas);
        let next = Rc::clone(&self.pending_metas);
        let mut next_ids: Vec<Option<EntryId>> = vec![None; next.len()];

        for op in reconcile(&previous, &next) {
            match op {
                MetaOp::Keep { previous, next } => {
                    next_ids[next] = Some(self.added_metas[previous]);
                }
                MetaOp::Change { previous, next: index } => {
                    let id = self.registry.change(
                        Kind::Meta,
                        self.added_metas[previous],
                        Declaration::Meta(next[index].clone()),
                    );
                    next_ids[index] = Some(id);
                }
                MetaOp::Add { next: index } => {
                    let id = self
                        .registry
                        .add_to_queue(Declaration::Meta(next[index].clone()));
                    next_ids[index] = Some(id);
                }
                MetaOp::Remove { previous } => {
                    self.registry
                        .remove_from_queue(Kind::Meta, self.added_metas[previous]);
                }
            }
        }

        self.added_metas = next_ids.into_iter().flatten().collect();
        self.previous_metas = next;
        self.metas_dirty = false;
    }

    fn sync_title(&mut self) {
        let Some(new) = &self.pending_title else {
            return;
        };
        match &self.title {
            Some(current) if &current.value == new => {}
            Some(current) => {
                let id = self
                    .registry
                    .change(Kind::Title, current.id, Declaration::Title(new.clone()));
                self.title = Some(TitleEntry {
                    id,
                    value: new.clone(),
                });
            }
            None => {
                let id = self.registry.add_to_queue(Declaration::Title(new.clone()));
                self.title = Some(TitleEntry {
                    id,
                    value: new.clone(),
                });
            }
        }
    }
}

impl Drop for HeadScope {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Scope for a single declaration: a title, title template, meta, link or lang.
///
/// Adds on mount, changes in place when the declared value differs, and
/// removes on dispose. Evaluating `None` withdraws the declaration.
pub struct DeclarationScope {
    registry: Registry,
    lifecycle: Lifecycle,
    pending: Option<Declaration>,
    entry: Option<(EntryId, Declaration)>,
}

impl DeclarationScope {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            lifecycle: Lifecycle::Unmounted,
            pending: None,
            entry: None,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn entry(&self) -> Option<EntryId> {
        self.entry.as_ref().map(|(id, _)| *id)
    }

    pub fn evaluate(&mut self, declaration: Option<Declaration>) {
        if self.lifecycle == Lifecycle::Disposed {
            log::warn!("evaluate called on a disposed declaration scope");
            return;
        }
        self.pending = declaration;
        if self.lifecycle == Lifecycle::Unmounted && !self.registry.environment_available() {
            self.sync();
            self.lifecycle = Lifecycle::PreMountQueued;
        }
    }

    pub fn commit(&mut self) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }
        self.lifecycle = Lifecycle::Mounted;
        self.sync();
    }

    pub fn dispose(&mut self) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }
        if let Some((id, declaration)) = self.entry.take() {
            self.registry.remove_from_queue(declaration.kind(), id);
        }
        self.lifecycle = Lifecycle::Disposed;
    }

    fn sync(&mut self) {
        match (self.entry.take(), self.pending.clone()) {
            (Some((id, current)), Some(next)) if current == next => {
                self.entry = Some((id, current));
            }
            (Some((id, current)), Some(next)) => {
                let id = self.registry.change(current.kind(), id, next.clone());
                self.entry = Some((id, next));
            }
            (None, Some(next)) => {
                let id = self.registry.add_to_queue(next.clone());
                self.entry = Some((id, next));
            }
            (Some((id, current)), None) => {
                self.registry.remove_from_queue(current.kind(), id);
            }
            (None, None) => {}
        }
    }
}

impl Drop for DeclarationScope {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
#[path = "tests/scope_tests.rs"]
mod tests;
