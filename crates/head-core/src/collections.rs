#[cfg(feature = "std-hash")]
pub mod map {
    pub use std::collections::HashSet;
}

#[cfg(not(feature = "std-hash"))]
pub mod map {
    pub use hashbrown::HashSet;
}

/// Insertion-ordered containers used where output order is observable.
pub mod ordered {
    pub use indexmap::{IndexMap, IndexSet};
}
