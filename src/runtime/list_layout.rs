//! Non-recycling list container.
//!
//! Every "data set changed" notification from the attached adapter discards all children and
//! rebuilds them from position 0. Each child is placed (view type, position, id) and appended
//! before it is bound, so a binder may read its own position back from the slot.

use std::cell::{RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::config::EnvConfig;
use crate::core::component::{Component, Dimension};
use crate::core::context::RenderContext;
use crate::core::model::ItemId;
use crate::core::text::width::{clip_to_width, fit_to_width};
use crate::error::{ListLayoutError, Result};
use crate::logging::RebuildLogger;
use crate::runtime::adapter::{Adapter, ViewHolder};
use crate::runtime::observer::{AdapterDataObserver, AdapterSubscription, ObserverRc};

/// Placement metadata of one built child.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChildInfo {
    pub item_view_type: usize,
    pub adapter_position: Option<usize>,
    pub item_id: Option<ItemId>,
}

struct LayoutState {
    adapter: Option<Rc<dyn Adapter>>,
    children: Vec<ViewHolder>,
    context: RenderContext,
    logger: RebuildLogger,
    pass: u64,
}

impl LayoutState {
    fn rebuild(&mut self) -> Result<()> {
        let discarded = self.children.len();
        self.children.clear();
        let Some(adapter) = self.adapter.clone() else {
            return Ok(());
        };

        self.pass += 1;
        let item_count = adapter.item_count();
        self.logger
            .rebuild_started(self.pass, discarded, item_count);
        self.children.reserve(item_count);

        let owner = Rc::downgrade(&adapter);
        for position in 0..item_count {
            let item_id = adapter.item_id(position)?;
            let item_view_type = adapter.item_view_type(position)?;
            let mut holder = adapter.create_view_holder(&self.context, item_view_type)?;
            holder.place(owner.clone(), item_view_type, position, item_id);
            self.children.push(holder);
            if let Some(child) = self.children.last_mut() {
                adapter.bind_view_holder(child, position)?;
            }
            self.logger
                .item_built(position, item_view_type, item_id.map(ItemId::raw));
        }

        self.logger.rebuild_finished(self.pass, self.children.len());
        Ok(())
    }
}

/// What readers see while a rebuild holds the layout state: the adapter, children and pass
/// count as of the last completed rebuild or detach.
#[derive(Default)]
struct Published {
    adapter: Option<Rc<dyn Adapter>>,
    children: Vec<ChildInfo>,
    pass: u64,
}

struct Shared {
    state: RefCell<LayoutState>,
    published: RefCell<Published>,
}

impl Shared {
    fn publish(&self, state: &LayoutState) {
        *self.published.borrow_mut() = Published {
            adapter: state.adapter.clone(),
            children: state.children.iter().map(ChildInfo::of).collect(),
            pass: state.pass,
        };
    }

    fn state_mut(&self) -> Result<RefMut<'_, LayoutState>> {
        self.state
            .try_borrow_mut()
            .map_err(|_| ListLayoutError::ReentrantRebuild)
    }

    fn rebuild(&self) -> Result<()> {
        let mut state = self.state_mut()?;
        let result = state.rebuild();
        self.publish(&state);
        result
    }
}

impl ChildInfo {
    fn of(holder: &ViewHolder) -> Self {
        Self {
            item_view_type: holder.item_view_type(),
            adapter_position: holder.adapter_position(),
            item_id: holder.item_id(),
        }
    }
}

struct ListLayoutDataObserver {
    shared: Weak<Shared>,
}

impl AdapterDataObserver for ListLayoutDataObserver {
    fn on_changed(&self) -> Result<()> {
        match self.shared.upgrade() {
            Some(shared) => shared.rebuild(),
            None => Ok(()),
        }
    }
}

/// Vertical container whose children are produced by an [`Adapter`].
///
/// The read accessors never fail. While a rebuild is running (for example when a binder reads
/// the layout it is being bound into) they report the state of the last completed rebuild, and
/// `with_child`/`with_child_mut` return `None`.
pub struct ListLayout {
    shared: Rc<Shared>,
    observer: ObserverRc,
    subscription: Option<AdapterSubscription>,
}

impl ListLayout {
    /// Layout configured from the process environment.
    pub fn new() -> Self {
        Self::with_config(&EnvConfig::from_env())
    }

    pub fn with_config(config: &EnvConfig) -> Self {
        let shared = Rc::new(Shared {
            state: RefCell::new(LayoutState {
                adapter: None,
                children: Vec::new(),
                context: RenderContext::new(),
                logger: RebuildLogger::from_config(config),
                pass: 0,
            }),
            published: RefCell::new(Published::default()),
        });
        let observer: ObserverRc = Rc::new(ListLayoutDataObserver {
            shared: Rc::downgrade(&shared),
        });
        Self {
            shared,
            observer,
            subscription: None,
        }
    }

    /// Context handed to binders on the next rebuild. Keeps the width hint of the last render
    /// unless `context` carries its own.
    pub fn set_render_context(&mut self, context: RenderContext) -> Result<()> {
        let mut state = self.shared.state_mut()?;
        let width_hint = context.width_hint().or(state.context.width_hint());
        state.context = context;
        if let Some(width) = width_hint {
            state.context.set_width_hint(width);
        }
        Ok(())
    }

    pub fn render_context(&self) -> Result<RenderContext> {
        self.shared
            .state
            .try_borrow()
            .map(|state| state.context.clone())
            .map_err(|_| ListLayoutError::ReentrantRebuild)
    }

    /// Subscribes to `adapter`, dropping the subscription to the previous one, then rebuilds.
    ///
    /// Setting the same adapter again re-subscribes and rebuilds. On error the subscription is
    /// kept and the children are left as the failed rebuild left them.
    pub fn set_adapter(&mut self, adapter: Rc<dyn Adapter>) -> Result<()> {
        {
            let mut state = self.shared.state_mut()?;
            self.subscription = None;
            state.adapter = Some(Rc::clone(&adapter));
        }
        self.subscription = Some(AdapterSubscription::new(
            Rc::clone(&adapter),
            Rc::clone(&self.observer),
        ));
        debug!(
            items = adapter.item_count(),
            observers = adapter.observable().observer_count(),
            "adapter attached to list layout"
        );
        self.shared.rebuild()
    }

    /// Unsubscribes from the current adapter and discards every child.
    pub fn detach_adapter(&mut self) -> Result<Option<Rc<dyn Adapter>>> {
        let mut state = self.shared.state_mut()?;
        self.subscription = None;
        state.children.clear();
        let adapter = state.adapter.take();
        self.shared.publish(&state);
        if adapter.is_some() {
            debug!("adapter detached from list layout");
        }
        Ok(adapter)
    }

    pub fn adapter(&self) -> Option<Rc<dyn Adapter>> {
        self.shared.published.borrow().adapter.clone()
    }

    /// The attached adapter as its concrete type, e.g. to register binders on a
    /// `MultiTypeAdapter` that was attached as `Rc<dyn Adapter>`.
    pub fn adapter_as<A: Adapter>(&self) -> Option<Rc<A>> {
        self.adapter()?.into_any_rc().downcast::<A>().ok()
    }

    pub fn child_count(&self) -> usize {
        self.shared.published.borrow().children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.child_count() == 0
    }

    /// Number of rebuilds run so far.
    pub fn rebuild_count(&self) -> u64 {
        self.shared.published.borrow().pass
    }

    pub fn children(&self) -> Vec<ChildInfo> {
        self.shared.published.borrow().children.clone()
    }

    /// Runs `f` against the child at `position`.
    pub fn with_child<R>(&self, position: usize, f: impl FnOnce(&ViewHolder) -> R) -> Option<R> {
        self.shared.state.try_borrow().ok()?.children.get(position).map(f)
    }

    pub fn with_child_mut<R>(
        &self,
        position: usize,
        f: impl FnOnce(&mut ViewHolder) -> R,
    ) -> Option<R> {
        self.shared.state_mut().ok()?.children.get_mut(position).map(f)
    }

    /// Delivers a click to the child at `position`. Returns `false` when the position is empty
    /// or the child has no click handler.
    ///
    /// The handler runs without the layout borrowed, so it may mutate the items and notify.
    pub fn perform_item_click(&self, position: usize) -> bool {
        let (pass, handler) = {
            let Ok(mut state) = self.shared.state.try_borrow_mut() else {
                return false;
            };
            let pass = state.pass;
            let handler = state
                .children
                .get_mut(position)
                .and_then(ViewHolder::take_on_click);
            (pass, handler)
        };
        let Some(mut handler) = handler else {
            return false;
        };

        handler();

        if let Ok(mut state) = self.shared.state.try_borrow_mut() {
            if state.pass == pass {
                if let Some(child) = state.children.get_mut(position) {
                    if !child.has_click_handler() {
                        child.set_on_click(Some(handler));
                    }
                }
            }
        }
        true
    }
}

impl Default for ListLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ListLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("ListLayout");
        match self.shared.state.try_borrow() {
            Ok(state) => out
                .field("has_adapter", &state.adapter.is_some())
                .field("children", &state.children.len())
                .field("pass", &state.pass),
            Err(_) => out.field("state", &"<rebuilding>"),
        };
        out.field("subscribed", &self.subscription.is_some())
            .finish()
    }
}

impl Component for ListLayout {
    fn render(&mut self, width: usize) -> Vec<String> {
        let Ok(mut state) = self.shared.state.try_borrow_mut() else {
            return Vec::new();
        };
        state.context.set_width_hint(width);

        let mut lines = Vec::new();
        for child in state.children.iter_mut() {
            let params = child.layout_params();
            let mut rendered = match params.width {
                Dimension::Exact(columns) => {
                    let columns = columns.min(width);
                    child
                        .item_view_mut()
                        .render(columns)
                        .iter()
                        .map(|line| fit_to_width(line, columns))
                        .collect::<Vec<_>>()
                }
                Dimension::MatchParent => child
                    .item_view_mut()
                    .render(width)
                    .iter()
                    .map(|line| fit_to_width(line, width))
                    .collect(),
                Dimension::WrapContent => child
                    .item_view_mut()
                    .render(width)
                    .iter()
                    .map(|line| clip_to_width(line, width))
                    .collect(),
            };
            if let Dimension::Exact(rows) = params.height {
                let blank = match params.width {
                    Dimension::Exact(columns) => " ".repeat(columns.min(width)),
                    Dimension::MatchParent => " ".repeat(width),
                    Dimension::WrapContent => String::new(),
                };
                rendered.resize(rows, blank);
            }
            lines.extend(rendered);
        }
        lines
    }

    fn invalidate(&mut self) {
        if let Ok(mut state) = self.shared.state.try_borrow_mut() {
            for child in state.children.iter_mut() {
                child.item_view_mut().invalidate();
            }
        }
    }
}
