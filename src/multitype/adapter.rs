//! Multi-type adapter: dispatches every position to the binder registered for its model.

use std::cell::RefCell;
use std::fmt;
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::config::EnvConfig;
use crate::core::context::RenderContext;
use crate::core::model::{view_as, ItemId, ItemModel, ItemRc, Items, TypeTag};
use crate::error::{ListLayoutError, Result};
use crate::multitype::binder::{AdapterRef, BinderCell, BinderRc, ItemViewBinder};
use crate::multitype::linker::{Linker, SelectorLinker};
use crate::multitype::pool::{MultiTypePool, SharedTypePool, TypeEntry, TypePool};
use crate::runtime::adapter::{Adapter, Payload, ViewHolder};
use crate::runtime::observer::AdapterDataObservable;

/// [`Adapter`] over a heterogeneous [`Items`] sequence.
///
/// Every position is resolved through the type pool: the model's own tag first, then the
/// first registered tag its [`ItemModel::fallback`] answers for, then the entry's linker picks
/// the binder within a one-to-many group. The resulting pool index is the item view type.
///
/// The items and the pool are shared handles; mutating either does not notify observers.
/// Call [`Adapter::notify_data_set_changed`] afterwards.
pub struct MultiTypeAdapter {
    items: RefCell<Items>,
    type_pool: RefCell<SharedTypePool>,
    observable: AdapterDataObservable,
    self_ref: Weak<MultiTypeAdapter>,
}

impl MultiTypeAdapter {
    pub fn new() -> Rc<Self> {
        Self::with_items(Items::new())
    }

    /// Pool capacity comes from `LIST_LAYOUT_POOL_CAPACITY` when set.
    pub fn with_items(items: Items) -> Rc<Self> {
        let capacity = EnvConfig::from_env().pool_capacity.unwrap_or_default();
        Self::with_capacity(items, capacity)
    }

    pub fn with_capacity(items: Items, capacity: usize) -> Rc<Self> {
        Self::with_pool(items, MultiTypePool::with_capacity(capacity).shared())
    }

    /// Uses `pool` as the registry. The pool may be shared with other adapters.
    pub fn with_pool(items: Items, pool: SharedTypePool) -> Rc<Self> {
        Rc::new_cyclic(|self_ref| Self {
            items: RefCell::new(items),
            type_pool: RefCell::new(pool),
            observable: AdapterDataObservable::new(),
            self_ref: self_ref.clone(),
        })
    }

    pub fn items(&self) -> Items {
        self.items.borrow().clone()
    }

    pub fn set_items(&self, items: Items) {
        *self.items.borrow_mut() = items;
    }

    pub fn type_pool(&self) -> SharedTypePool {
        Rc::clone(&*self.type_pool.borrow())
    }

    pub fn set_type_pool(&self, pool: SharedTypePool) {
        *self.type_pool.borrow_mut() = pool;
    }

    /// Model at `position`.
    pub fn item(&self, position: usize) -> Result<ItemRc> {
        let items = self.items.borrow();
        items
            .get(position)
            .ok_or(ListLayoutError::PositionOutOfBounds {
                position,
                len: items.len(),
            })
    }

    /// Registers `binder` as the only binder for `T`, replacing any earlier registration
    /// of `T`. Returns whether one was replaced.
    pub fn register<T, B>(&self, binder: B) -> bool
    where
        T: ItemModel,
        B: ItemViewBinder<T>,
    {
        let tag = TypeTag::of::<T>();
        let binder = BinderCell::<T, B>::erased(binder);
        let overridden = self.evict(tag, &[binder.name()]);

        self.type_pool()
            .borrow_mut()
            .register(TypeEntry::new(tag, Rc::clone(&binder), Linker::Singleton));
        self.attach(&binder);
        overridden
    }

    /// Starts a one-to-many registration for `T`.
    ///
    /// ```ignore
    /// adapter
    ///     .register_many::<Image>()
    ///     .to(Align::Center, CenterBinder)
    ///     .to(Align::Left, LeftBinder)
    ///     .with_selector(|_, image| image.align)?;
    /// ```
    pub fn register_many<T: ItemModel>(&self) -> OneToManyFlow<'_, T> {
        OneToManyFlow {
            adapter: self,
            _model: PhantomData,
        }
    }

    /// Copies every entry of `source` into this adapter's pool and attaches its binders
    /// here. Each source tag is evicted once before its entries are copied, so repeated
    /// calls with the same source leave the pool unchanged. Returns the number of entries
    /// copied.
    pub fn register_all(&self, source: &dyn TypePool) -> usize {
        let own = self.type_pool();
        let source_ptr = (source as *const dyn TypePool).cast::<()>();
        if std::ptr::eq(source_ptr, own.as_ptr().cast::<()>().cast_const()) {
            return 0;
        }

        let entries = source.entries();
        let mut tags: Vec<TypeTag> = Vec::new();
        for entry in &entries {
            if !tags.contains(&entry.tag) {
                tags.push(entry.tag);
            }
        }

        {
            let mut pool = own.borrow_mut();
            for tag in &tags {
                pool.unregister(*tag);
            }
            for entry in &entries {
                pool.register(entry.clone());
            }
        }
        for entry in &entries {
            self.attach(&entry.binder);
        }

        debug!(
            entries = entries.len(),
            models = tags.len(),
            "copied type pool registrations"
        );
        entries.len()
    }

    /// Item view type of `position`: pool index of the resolved entry plus the linker
    /// offset.
    pub fn index_in_types_of(&self, position: usize) -> Result<usize> {
        self.resolve(position).map(|resolved| resolved.index)
    }

    fn resolve(&self, position: usize) -> Result<Resolved> {
        let item = self.item(position)?;
        let not_found = || ListLayoutError::BinderNotFound {
            type_name: item.type_tag().short_name(),
        };

        let pool = self.type_pool();
        let (base, tag, linker) = {
            let pool = pool.borrow();
            let base = pool.first_index_of(item.as_ref()).ok_or_else(not_found)?;
            let entry = pool.entry(base).ok_or_else(not_found)?;
            (base, entry.tag, entry.linker.clone())
        };

        let offset = {
            let model = view_as(item.as_ref(), tag).ok_or_else(not_found)?;
            linker.index(position, model)?
        };
        let index = base + offset;
        let entry = pool
            .borrow()
            .entry(index)
            .cloned()
            .ok_or(ListLayoutError::ViewTypeOutOfBounds {
                item_view_type: index,
                len: pool.borrow().size(),
            })?;

        Ok(Resolved { index, item, entry })
    }

    fn entry_at(&self, item_view_type: usize) -> Result<TypeEntry> {
        let pool = self.type_pool();
        let pool = pool.borrow();
        pool.entry(item_view_type)
            .cloned()
            .ok_or(ListLayoutError::ViewTypeOutOfBounds {
                item_view_type,
                len: pool.size(),
            })
    }

    /// Removes every entry for `tag`, warning when that replaces an earlier registration.
    fn evict(&self, tag: TypeTag, binders: &[&'static str]) -> bool {
        let overridden = self.type_pool().borrow_mut().unregister(tag);
        if overridden {
            warn!(
                model = tag.short_name(),
                binders = ?binders,
                "replacing existing binder registration"
            );
        }
        overridden
    }

    fn attach(&self, binder: &BinderRc) {
        binder.attach(&AdapterRef::new(self.self_ref.clone(), binder.name()));
        debug!(binder = binder.name(), model = ?binder.model_tag(), "binder attached");
    }
}

struct Resolved {
    index: usize,
    item: ItemRc,
    entry: TypeEntry,
}

impl Adapter for MultiTypeAdapter {
    fn item_count(&self) -> usize {
        self.items.borrow().len()
    }

    fn item_view_type(&self, position: usize) -> Result<usize> {
        self.index_in_types_of(position)
    }

    fn item_id(&self, position: usize) -> Result<Option<ItemId>> {
        let Resolved { item, entry, .. } = self.resolve(position)?;
        let model = view_as(item.as_ref(), entry.tag).ok_or(ListLayoutError::BinderNotFound {
            type_name: item.type_tag().short_name(),
        })?;
        entry.binder.item_id(model)
    }

    fn create_view_holder(&self, ctx: &RenderContext, item_view_type: usize) -> Result<ViewHolder> {
        let entry = self.entry_at(item_view_type)?;
        Ok(entry.binder.create_view_holder(ctx))
    }

    fn bind_view_holder(&self, holder: &mut ViewHolder, position: usize) -> Result<()> {
        self.bind_view_holder_with_payloads(holder, position, &[])
    }

    fn bind_view_holder_with_payloads(
        &self,
        holder: &mut ViewHolder,
        position: usize,
        payloads: &[Payload],
    ) -> Result<()> {
        let item = self.item(position)?;
        let entry = self.entry_at(holder.item_view_type())?;
        let model = view_as(item.as_ref(), entry.tag).ok_or(ListLayoutError::BinderNotFound {
            type_name: item.type_tag().short_name(),
        })?;
        entry.binder.bind_view_holder(holder, model, payloads)
    }

    fn observable(&self) -> &AdapterDataObservable {
        &self.observable
    }
}

impl fmt::Debug for MultiTypeAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pool = self.type_pool();
        let registered = pool.try_borrow().map(|pool| pool.size()).ok();
        f.debug_struct("MultiTypeAdapter")
            .field("items", &self.items.borrow().len())
            .field("registered", &registered)
            .field("observers", &self.observable.observer_count())
            .finish()
    }
}

/// First step of a one-to-many registration; add at least one binder.
#[must_use = "a one-to-many registration does nothing until `with_selector` is called"]
pub struct OneToManyFlow<'a, T> {
    adapter: &'a MultiTypeAdapter,
    _model: PhantomData<fn(&T)>,
}

impl<'a, T: ItemModel> OneToManyFlow<'a, T> {
    /// Links `binder` to the variant `key` returned by the selector.
    pub fn to<K, B>(self, key: K, binder: B) -> OneToManyBuilder<'a, T, K>
    where
        K: Eq + Hash + Debug + 'static,
        B: ItemViewBinder<T>,
    {
        OneToManyBuilder {
            adapter: self.adapter,
            keys: Vec::new(),
            binders: Vec::new(),
            _model: PhantomData,
        }
        .to(key, binder)
    }
}

/// Accumulates the binders of a one-to-many registration, in offset order.
#[must_use = "a one-to-many registration does nothing until `with_selector` is called"]
pub struct OneToManyBuilder<'a, T, K> {
    adapter: &'a MultiTypeAdapter,
    keys: Vec<K>,
    binders: Vec<BinderRc>,
    _model: PhantomData<fn(&T)>,
}

impl<'a, T, K> OneToManyBuilder<'a, T, K>
where
    T: ItemModel,
    K: Eq + Hash + Debug + 'static,
{
    pub fn to<B: ItemViewBinder<T>>(mut self, key: K, binder: B) -> Self {
        self.keys.push(key);
        self.binders.push(BinderCell::<T, B>::erased(binder));
        self
    }

    /// Finishes the registration. `select` maps an item to the key of the binder that
    /// renders it. Returns whether an earlier registration of `T` was replaced.
    pub fn with_selector(self, select: impl Fn(usize, &T) -> K + 'static) -> Result<bool> {
        let names: Vec<&'static str> = self.binders.iter().map(|binder| binder.name()).collect();
        let selector = SelectorLinker::new(self.keys, names.clone(), select)?;
        let linker = Linker::Selector(Rc::new(selector));

        let tag = TypeTag::of::<T>();
        let overridden = self.adapter.evict(tag, &names);
        {
            let pool = self.adapter.type_pool();
            let mut pool = pool.borrow_mut();
            for binder in &self.binders {
                pool.register(TypeEntry::new(tag, Rc::clone(binder), linker.clone()));
            }
        }
        for binder in &self.binders {
            self.adapter.attach(binder);
        }
        Ok(overridden)
    }
}
