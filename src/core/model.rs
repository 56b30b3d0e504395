//! Item models, type tags and the shared item sequence.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Object-safe access to `Any` for trait objects built on top of it.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any_rc(self: Rc<Self>) -> Rc<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any_rc(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

/// Stable registry key for a model type.
///
/// Equality and hashing use the `TypeId` only; the name is kept for diagnostics.
#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(self) -> TypeId {
        self.id
    }

    /// Full type path, as reported by `std::any::type_name`.
    pub fn name(self) -> &'static str {
        self.name
    }

    /// Last path segment of [`TypeTag::name`].
    pub fn short_name(self) -> &'static str {
        short_type_name(self.name)
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

pub(crate) fn short_type_name(name: &'static str) -> &'static str {
    let base = name.split('<').next().unwrap_or(name);
    match base.rfind("::") {
        Some(idx) => &name[idx + 2..],
        None => name,
    }
}

/// A model that can be placed in [`Items`] and dispatched to a binder.
///
/// Ancestor lookup is explicit: when no registration exists for a model's own tag,
/// the registry asks [`ItemModel::fallback`] for each registered tag in order and
/// binds the first view it gets back.
///
/// ```ignore
/// struct Photo { src: String }
/// impl ItemModel for Photo {}
///
/// struct CaptionedPhoto { photo: Photo, caption: String }
/// impl ItemModel for CaptionedPhoto {
///     fn fallback(&self, tag: TypeTag) -> Option<&dyn ItemModel> {
///         (tag == TypeTag::of::<Photo>()).then_some(&self.photo as &dyn ItemModel)
///     }
/// }
/// ```
pub trait ItemModel: AsAny + 'static {
    fn type_tag(&self) -> TypeTag {
        TypeTag::of::<Self>()
    }

    /// View of this model as the ancestor model identified by `tag`, if it can stand in
    /// for one.
    fn fallback(&self, _tag: TypeTag) -> Option<&dyn ItemModel> {
        None
    }
}

/// Returns `model` itself when it carries `tag`, otherwise its fallback view for `tag`.
pub fn view_as(model: &dyn ItemModel, tag: TypeTag) -> Option<&dyn ItemModel> {
    if model.type_tag() == tag {
        Some(model)
    } else {
        model.fallback(tag)
    }
}

/// Downcasts a model view to its concrete type.
pub fn downcast_model<T: ItemModel>(model: &dyn ItemModel) -> Option<&T> {
    model.as_any().downcast_ref::<T>()
}

/// Stable identity of a list item, as reported by its binder.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ItemId(u64);

impl ItemId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

pub type ItemRc = Rc<dyn ItemModel>;

/// Shared, externally mutated sequence of heterogeneous models.
///
/// Clones share storage. Mutating the sequence never triggers a rebuild on its own;
/// callers follow up with `notify_data_set_changed` on the adapter.
#[derive(Clone, Default)]
pub struct Items {
    inner: Rc<RefCell<Vec<ItemRc>>>,
}

impl Items {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Vec::with_capacity(capacity))),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    pub fn get(&self, position: usize) -> Option<ItemRc> {
        self.inner.borrow().get(position).map(Rc::clone)
    }

    pub fn push(&self, item: impl ItemModel) {
        self.inner.borrow_mut().push(Rc::new(item));
    }

    pub fn push_rc(&self, item: ItemRc) {
        self.inner.borrow_mut().push(item);
    }

    pub fn insert(&self, position: usize, item: impl ItemModel) {
        let mut items = self.inner.borrow_mut();
        let position = position.min(items.len());
        items.insert(position, Rc::new(item));
    }

    pub fn remove(&self, position: usize) -> Option<ItemRc> {
        let mut items = self.inner.borrow_mut();
        if position < items.len() {
            Some(items.remove(position))
        } else {
            None
        }
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().clear();
    }

    pub fn extend<I>(&self, items: I)
    where
        I: IntoIterator<Item = ItemRc>,
    {
        self.inner.borrow_mut().extend(items);
    }

    /// Snapshot of the current models.
    pub fn to_vec(&self) -> Vec<ItemRc> {
        self.inner.borrow().clone()
    }

    /// Whether `self` and `other` share storage.
    pub fn ptr_eq(&self, other: &Items) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Items {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items = self.inner.borrow();
        f.debug_list()
            .entries(items.iter().map(|item| item.type_tag()))
            .finish()
    }
}

impl FromIterator<ItemRc> for Items {
    fn from_iter<I: IntoIterator<Item = ItemRc>>(iter: I) -> Self {
        Self {
            inner: Rc::new(RefCell::new(iter.into_iter().collect())),
        }
    }
}
