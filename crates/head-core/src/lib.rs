//! Reconciled document head declarations: title, meta, link and lang.
//!
//! Independent components describe what they want in the document head. Each
//! component instance gets a [`HeadScope`] that reconciles its declarations
//! against what it declared before and issues the minimal add / change /
//! remove operations to a shared [`Registry`]. The registry forwards every net
//! mutation to an [`Applier`] and can render the resolved head as HTML for
//! server contexts.

pub mod applier;
pub mod collections;
pub mod hash;
pub mod link;
pub mod memo;
pub mod meta;
pub mod platform;
pub mod reconcile;
pub mod registry;
pub mod render;
pub mod scope;

pub use applier::{ApplyError, Applier, MemoryDocument};
pub use hash::StructuralKey;
pub use link::Link;
pub use memo::Memo;
pub use meta::{normalize, MetaInstance, MetaKeyword, MetaOptions, MetaRecord};
pub use platform::{Client, EnvironmentProbe, Server};
pub use reconcile::{mutation_count, reconcile, MetaOp};
pub use registry::{Declaration, Entry, EntryId, Kind, QueueChange, Registry, RegistryConfig};
pub use render::HeadSnapshot;
pub use scope::{DeclarationScope, HeadObject, HeadScope, Lifecycle};

/// Renders the registry's resolved head as HTML.
pub fn to_string(registry: &Registry) -> String {
    registry.to_html()
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
