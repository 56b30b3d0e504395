//! Type pools: the ordered registry of (model tag, binder, linker) entries.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::core::model::{ItemModel, TypeTag};
use crate::multitype::binder::BinderRc;
use crate::multitype::linker::Linker;

/// One registration. One-to-many registrations occupy consecutive entries sharing the
/// same tag and linker.
#[derive(Clone)]
pub struct TypeEntry {
    pub tag: TypeTag,
    pub binder: BinderRc,
    pub linker: Linker,
}

impl TypeEntry {
    pub fn new(tag: TypeTag, binder: BinderRc, linker: Linker) -> Self {
        Self { tag, binder, linker }
    }
}

impl fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEntry")
            .field("tag", &self.tag)
            .field("binder", &self.binder.name())
            .field("linker", &self.linker)
            .finish()
    }
}

/// Ordered registry consulted by the adapter. An entry's index is the item view type of
/// the views its binder creates.
pub trait TypePool {
    fn register(&mut self, entry: TypeEntry);

    /// Removes every entry registered for exactly `tag`. Returns whether any was removed.
    fn unregister(&mut self, tag: TypeTag) -> bool;

    fn size(&self) -> usize;

    /// Index of the first entry for `model`: an exact tag match wins over any fallback, and
    /// among fallbacks the first registered entry wins.
    fn first_index_of(&self, model: &dyn ItemModel) -> Option<usize>;

    fn entry(&self, index: usize) -> Option<&TypeEntry>;

    fn type_tag(&self, index: usize) -> Option<TypeTag> {
        self.entry(index).map(|entry| entry.tag)
    }

    fn binder(&self, index: usize) -> Option<BinderRc> {
        self.entry(index).map(|entry| Rc::clone(&entry.binder))
    }

    fn linker(&self, index: usize) -> Option<Linker> {
        self.entry(index).map(|entry| entry.linker.clone())
    }

    /// Owned copy of every entry, in registration order.
    fn entries(&self) -> Vec<TypeEntry> {
        (0..self.size())
            .filter_map(|index| self.entry(index).cloned())
            .collect()
    }
}

/// Shared pool handle. Several adapters may hold the same pool.
pub type SharedTypePool = Rc<RefCell<dyn TypePool>>;

/// Vector-backed [`TypePool`].
#[derive(Default)]
pub struct MultiTypePool {
    entries: Vec<TypeEntry>,
}

impl MultiTypePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn shared(self) -> SharedTypePool {
        Rc::new(RefCell::new(self))
    }
}

impl TypePool for MultiTypePool {
    fn register(&mut self, entry: TypeEntry) {
        self.entries.push(entry);
    }

    fn unregister(&mut self, tag: TypeTag) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.tag != tag);
        self.entries.len() != before
    }

    fn size(&self) -> usize {
        self.entries.len()
    }

    fn first_index_of(&self, model: &dyn ItemModel) -> Option<usize> {
        let tag = model.type_tag();
        self.entries
            .iter()
            .position(|entry| entry.tag == tag)
            .or_else(|| {
                self.entries
                    .iter()
                    .position(|entry| model.fallback(entry.tag).is_some())
            })
    }

    fn entry(&self, index: usize) -> Option<&TypeEntry> {
        self.entries.get(index)
    }
}

impl fmt::Debug for MultiTypePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}
