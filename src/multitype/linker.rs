//! Linkers pick the binder within a registration group for one item.

use std::collections::HashMap;
use std::fmt;
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use crate::core::model::{downcast_model, ItemModel, TypeTag};
use crate::error::{ListLayoutError, Result};

type SelectFn = dyn Fn(usize, &dyn ItemModel) -> Result<usize>;

/// Offset resolver for the entries registered for one model type.
#[derive(Clone)]
pub enum Linker {
    /// One-to-one registration: always offset 0.
    Singleton,
    /// One-to-many registration: a user selector picks the binder.
    Selector(Rc<SelectorLinker>),
}

impl Linker {
    /// Offset of the binder for `item` within its group, in `0..group_size()`.
    pub fn index(&self, position: usize, item: &dyn ItemModel) -> Result<usize> {
        match self {
            Linker::Singleton => Ok(0),
            Linker::Selector(selector) => selector.index(position, item),
        }
    }

    pub fn group_size(&self) -> usize {
        match self {
            Linker::Singleton => 1,
            Linker::Selector(selector) => selector.binders.len(),
        }
    }
}

impl fmt::Debug for Linker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Linker::Singleton => f.write_str("Singleton"),
            Linker::Selector(selector) => f
                .debug_tuple("Selector")
                .field(&selector.binders)
                .finish(),
        }
    }
}

/// Maps the variant key returned by a user selector to a binder offset.
///
/// The key→offset table is built once at registration. A key missing from the table is a
/// configuration bug and fails with [`ListLayoutError::VariantOutOfBounds`].
pub struct SelectorLinker {
    select: Box<SelectFn>,
    binders: Vec<&'static str>,
}

impl fmt::Debug for SelectorLinker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectorLinker")
            .field("binders", &self.binders)
            .finish_non_exhaustive()
    }
}

impl SelectorLinker {
    /// `keys[i]` selects the binder named `binders[i]`.
    pub fn new<T, K>(
        keys: Vec<K>,
        binders: Vec<&'static str>,
        select: impl Fn(usize, &T) -> K + 'static,
    ) -> Result<Self>
    where
        T: ItemModel,
        K: Eq + Hash + Debug + 'static,
    {
        if keys.is_empty() {
            return Err(ListLayoutError::invalid_argument(
                "a one-to-many registration needs at least one binder",
            ));
        }
        if keys.len() != binders.len() {
            return Err(ListLayoutError::invalid_argument(format!(
                "{} variant keys for {} binders",
                keys.len(),
                binders.len()
            )));
        }

        let mut offsets = HashMap::with_capacity(keys.len());
        for (offset, key) in keys.into_iter().enumerate() {
            if offsets.contains_key(&key) {
                return Err(ListLayoutError::invalid_argument(format!(
                    "variant key {key:?} is linked to more than one binder"
                )));
            }
            offsets.insert(key, offset);
        }

        let names = binders.clone();
        let select = move |position: usize, item: &dyn ItemModel| -> Result<usize> {
            let model = downcast_model::<T>(item).ok_or(ListLayoutError::ModelMismatch {
                expected: TypeTag::of::<T>().short_name(),
                found: item.type_tag().short_name(),
            })?;
            let key = select(position, model);
            offsets
                .get(&key)
                .copied()
                .ok_or_else(|| ListLayoutError::VariantOutOfBounds {
                    selected: format!("{key:?}"),
                    binders: names.clone(),
                })
        };

        Ok(Self {
            select: Box::new(select),
            binders,
        })
    }

    pub fn index(&self, position: usize, item: &dyn ItemModel) -> Result<usize> {
        (self.select)(position, item)
    }

    pub fn binders(&self) -> &[&'static str] {
        &self.binders
    }
}
