//! Multi-type dispatch: type pool, linkers, binders and the adapter that ties them together.

pub mod adapter;
pub mod binder;
pub mod linker;
pub mod pool;

pub use adapter::{MultiTypeAdapter, OneToManyBuilder, OneToManyFlow};
pub use binder::{AdapterRef, AdapterSlot, BinderRc, ErasedBinder, ItemViewBinder};
pub use linker::{Linker, SelectorLinker};
pub use pool::{MultiTypePool, SharedTypePool, TypeEntry, TypePool};
