//! Adapter contract and view holders.

use std::any::Any;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::core::component::{ClickHandler, ItemView, LayoutParams};
use crate::core::context::RenderContext;
use crate::core::model::{AsAny, ItemId};
use crate::error::Result;
use crate::runtime::observer::{AdapterDataObservable, ObserverRc};

/// Partial re-render hint passed through to binders.
pub type Payload = Rc<dyn Any>;

/// Supplies item views to a `ListLayout`.
///
/// Positions are always `0..item_count()`. The layout rebuilds all of its children whenever
/// [`Adapter::notify_data_set_changed`] reaches it. The `AsAny` bound lets a host recover the
/// concrete adapter from the layout with [`ListLayout::adapter_as`](crate::ListLayout::adapter_as).
pub trait Adapter: AsAny {
    fn item_count(&self) -> usize;

    fn item_view_type(&self, _position: usize) -> Result<usize> {
        Ok(0)
    }

    fn item_id(&self, _position: usize) -> Result<Option<ItemId>> {
        Ok(None)
    }

    fn create_view_holder(&self, ctx: &RenderContext, item_view_type: usize) -> Result<ViewHolder>;

    fn bind_view_holder(&self, holder: &mut ViewHolder, position: usize) -> Result<()>;

    /// Binds with partial-update hints. The list layout itself always passes none.
    fn bind_view_holder_with_payloads(
        &self,
        holder: &mut ViewHolder,
        position: usize,
        _payloads: &[Payload],
    ) -> Result<()> {
        self.bind_view_holder(holder, position)
    }

    fn observable(&self) -> &AdapterDataObservable;

    fn has_observers(&self) -> bool {
        self.observable().has_observers()
    }

    fn register_adapter_data_observer(&self, observer: ObserverRc) -> bool {
        self.observable().register_observer(observer)
    }

    fn unregister_adapter_data_observer(&self, observer: &ObserverRc) -> bool {
        self.observable().unregister_observer(observer)
    }

    fn notify_data_set_changed(&self) -> Result<()> {
        if !self.has_observers() {
            return Ok(());
        }
        self.observable().notify_changed()
    }
}

/// One created item: its view plus the placement metadata assigned by the layout.
///
/// Holders live for exactly one rebuild pass.
pub struct ViewHolder {
    item_view: Box<dyn ItemView>,
    layout_params: Option<LayoutParams>,
    on_click: Option<ClickHandler>,
    item_view_type: usize,
    adapter_position: Option<usize>,
    item_id: Option<ItemId>,
    adapter: Option<Weak<dyn Adapter>>,
}

impl ViewHolder {
    pub fn new(item_view: impl ItemView) -> Self {
        Self::from_boxed(Box::new(item_view))
    }

    pub fn from_boxed(item_view: Box<dyn ItemView>) -> Self {
        let layout_params = item_view.layout_params();
        Self {
            item_view,
            layout_params,
            on_click: None,
            item_view_type: 0,
            adapter_position: None,
            item_id: None,
            adapter: None,
        }
    }

    pub fn item_view(&self) -> &dyn ItemView {
        &*self.item_view
    }

    pub fn item_view_mut(&mut self) -> &mut dyn ItemView {
        &mut *self.item_view
    }

    pub fn view<V: ItemView>(&self) -> Option<&V> {
        (*self.item_view).as_any().downcast_ref::<V>()
    }

    pub fn view_mut<V: ItemView>(&mut self) -> Option<&mut V> {
        (*self.item_view).as_any_mut().downcast_mut::<V>()
    }

    /// Typed lens used by binders: the view plus this holder's metadata and hooks.
    pub fn slot<V: ItemView>(&mut self) -> Option<ItemSlot<'_, V>> {
        let Self {
            item_view,
            layout_params,
            on_click,
            item_view_type,
            adapter_position,
            item_id,
            adapter,
        } = self;
        let view = (**item_view).as_any_mut().downcast_mut::<V>()?;
        Some(ItemSlot {
            view,
            layout_params,
            on_click,
            item_view_type: *item_view_type,
            adapter_position: *adapter_position,
            item_id: *item_id,
            adapter: adapter.as_ref(),
        })
    }

    pub fn item_view_type(&self) -> usize {
        self.item_view_type
    }

    /// Position this holder was placed at, or `None` before placement.
    pub fn adapter_position(&self) -> Option<usize> {
        self.adapter_position
    }

    pub fn item_id(&self) -> Option<ItemId> {
        self.item_id
    }

    pub fn adapter(&self) -> Option<Rc<dyn Adapter>> {
        self.adapter.as_ref().and_then(Weak::upgrade)
    }

    /// Layout params requested by the view or binder, falling back to the default.
    pub fn layout_params(&self) -> LayoutParams {
        self.layout_params.unwrap_or_default()
    }

    pub fn set_layout_params(&mut self, params: LayoutParams) {
        self.layout_params = Some(params);
    }

    pub fn set_on_click(&mut self, handler: Option<ClickHandler>) {
        self.on_click = handler;
    }

    pub fn has_click_handler(&self) -> bool {
        self.on_click.is_some()
    }

    /// Runs the click handler. Returns `false` when none is attached.
    pub fn perform_click(&mut self) -> bool {
        match self.on_click.as_mut() {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }

    pub(crate) fn take_on_click(&mut self) -> Option<ClickHandler> {
        self.on_click.take()
    }

    pub(crate) fn place(
        &mut self,
        adapter: Weak<dyn Adapter>,
        item_view_type: usize,
        position: usize,
        item_id: Option<ItemId>,
    ) {
        self.adapter = Some(adapter);
        self.item_view_type = item_view_type;
        self.adapter_position = Some(position);
        self.item_id = item_id;
        if self.layout_params.is_none() {
            self.layout_params = Some(LayoutParams::default());
        }
    }
}

impl fmt::Debug for ViewHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewHolder")
            .field("item_view_type", &self.item_view_type)
            .field("adapter_position", &self.adapter_position)
            .field("item_id", &self.item_id)
            .field("layout_params", &self.layout_params)
            .field("has_click_handler", &self.on_click.is_some())
            .finish()
    }
}

/// Mutable view of a placed holder, typed to the view its binder created.
pub struct ItemSlot<'a, V> {
    view: &'a mut V,
    layout_params: &'a mut Option<LayoutParams>,
    on_click: &'a mut Option<ClickHandler>,
    item_view_type: usize,
    adapter_position: Option<usize>,
    item_id: Option<ItemId>,
    adapter: Option<&'a Weak<dyn Adapter>>,
}

impl<'a, V> ItemSlot<'a, V> {
    pub fn view(&self) -> &V {
        &*self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut *self.view
    }

    pub fn item_view_type(&self) -> usize {
        self.item_view_type
    }

    pub fn adapter_position(&self) -> Option<usize> {
        self.adapter_position
    }

    pub fn item_id(&self) -> Option<ItemId> {
        self.item_id
    }

    pub fn adapter(&self) -> Option<Rc<dyn Adapter>> {
        self.adapter.and_then(Weak::upgrade)
    }

    pub fn set_layout_params(&mut self, params: LayoutParams) {
        *self.layout_params = Some(params);
    }

    pub fn set_on_click(&mut self, handler: impl FnMut() + 'static) {
        *self.on_click = Some(Box::new(handler));
    }

    pub fn clear_on_click(&mut self) {
        *self.on_click = None;
    }
}
