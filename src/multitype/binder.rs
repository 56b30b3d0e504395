//! Item view binders: one binder creates and fills the view for one model type.

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

use crate::core::component::ItemView;
use crate::core::context::RenderContext;
use crate::core::model::{downcast_model, short_type_name, ItemId, ItemModel, TypeTag};
use crate::error::{ListLayoutError, Result};
use crate::multitype::adapter::MultiTypeAdapter;
use crate::runtime::adapter::{ItemSlot, Payload, ViewHolder};

/// Creates and binds the item view for models of type `T`.
pub trait ItemViewBinder<T: ItemModel>: 'static {
    type View: ItemView;

    /// Creates a fresh view. Called once per item per rebuild; views are never reused.
    fn create_view(&self, ctx: &RenderContext) -> Self::View;

    /// Fills `slot` from `item`. The slot is already placed, so its position, type and id
    /// are readable.
    fn bind(&self, slot: &mut ItemSlot<'_, Self::View>, item: &T);

    fn bind_with_payloads(
        &self,
        slot: &mut ItemSlot<'_, Self::View>,
        item: &T,
        _payloads: &[Payload],
    ) {
        self.bind(slot, item);
    }

    fn item_id(&self, _item: &T) -> Option<ItemId> {
        None
    }

    /// Called when the binder is registered on an adapter.
    fn on_attach(&self, _adapter: &AdapterRef) {}
}

/// Weak back-reference from a binder to the adapter it is registered on.
#[derive(Clone)]
pub struct AdapterRef {
    adapter: Weak<MultiTypeAdapter>,
    binder: &'static str,
}

impl AdapterRef {
    pub(crate) fn new(adapter: Weak<MultiTypeAdapter>, binder: &'static str) -> Self {
        Self { adapter, binder }
    }

    pub fn get(&self) -> Result<Rc<MultiTypeAdapter>> {
        self.adapter
            .upgrade()
            .ok_or(ListLayoutError::BinderDetached {
                binder: self.binder,
            })
    }

    pub fn ptr_eq(&self, adapter: &Rc<MultiTypeAdapter>) -> bool {
        std::ptr::eq(self.adapter.as_ptr(), Rc::as_ptr(adapter))
    }
}

impl fmt::Debug for AdapterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRef")
            .field("binder", &self.binder)
            .field("alive", &(self.adapter.strong_count() > 0))
            .finish()
    }
}

/// Storage for the back-reference handed to [`ItemViewBinder::on_attach`].
pub struct AdapterSlot {
    binder: &'static str,
    adapter: RefCell<Option<AdapterRef>>,
}

impl AdapterSlot {
    pub fn for_binder<B: ?Sized + 'static>() -> Self {
        Self {
            binder: short_type_name(std::any::type_name::<B>()),
            adapter: RefCell::new(None),
        }
    }

    pub fn attach(&self, adapter: &AdapterRef) {
        *self.adapter.borrow_mut() = Some(adapter.clone());
    }

    pub fn is_attached(&self) -> bool {
        self.adapter.borrow().is_some()
    }

    /// The adapter the binder was last registered on.
    pub fn get(&self) -> Result<Rc<MultiTypeAdapter>> {
        match self.adapter.borrow().as_ref() {
            Some(adapter) => adapter.get(),
            None => Err(ListLayoutError::BinderDetached {
                binder: self.binder,
            }),
        }
    }
}

/// Type-erased binder as stored in a type pool.
pub trait ErasedBinder {
    fn name(&self) -> &'static str;

    /// Tag of the model type the binder accepts.
    fn model_tag(&self) -> TypeTag;

    fn create_view_holder(&self, ctx: &RenderContext) -> ViewHolder;

    /// `item` must already be viewed as [`ErasedBinder::model_tag`].
    fn bind_view_holder(
        &self,
        holder: &mut ViewHolder,
        item: &dyn ItemModel,
        payloads: &[Payload],
    ) -> Result<()>;

    fn item_id(&self, item: &dyn ItemModel) -> Result<Option<ItemId>>;

    fn attach(&self, adapter: &AdapterRef);
}

pub type BinderRc = Rc<dyn ErasedBinder>;

pub(crate) struct BinderCell<T, B> {
    binder: B,
    name: &'static str,
    _model: PhantomData<fn(&T)>,
}

impl<T: ItemModel, B: ItemViewBinder<T>> BinderCell<T, B> {
    pub(crate) fn new(binder: B) -> Self {
        Self {
            binder,
            name: short_type_name(std::any::type_name::<B>()),
            _model: PhantomData,
        }
    }

    pub(crate) fn erased(binder: B) -> BinderRc {
        Rc::new(Self::new(binder))
    }

    fn model<'m>(&self, item: &'m dyn ItemModel) -> Result<&'m T> {
        downcast_model::<T>(item).ok_or(ListLayoutError::ModelMismatch {
            expected: TypeTag::of::<T>().short_name(),
            found: item.type_tag().short_name(),
        })
    }
}

impl<T: ItemModel, B: ItemViewBinder<T>> ErasedBinder for BinderCell<T, B> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn model_tag(&self) -> TypeTag {
        TypeTag::of::<T>()
    }

    fn create_view_holder(&self, ctx: &RenderContext) -> ViewHolder {
        ViewHolder::new(self.binder.create_view(ctx))
    }

    fn bind_view_holder(
        &self,
        holder: &mut ViewHolder,
        item: &dyn ItemModel,
        payloads: &[Payload],
    ) -> Result<()> {
        let model = self.model(item)?;
        let mut slot = holder
            .slot::<B::View>()
            .ok_or(ListLayoutError::ViewMismatch { binder: self.name })?;
        self.binder.bind_with_payloads(&mut slot, model, payloads);
        Ok(())
    }

    fn item_id(&self, item: &dyn ItemModel) -> Result<Option<ItemId>> {
        Ok(self.binder.item_id(self.model(item)?))
    }

    fn attach(&self, adapter: &AdapterRef) {
        self.binder.on_attach(adapter);
    }
}
