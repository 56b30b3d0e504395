//! Non-recycling list layout with a multi-type adapter.
//!
//! Invariant: a [`ListLayout`] only rebuilds in response to its adapter's
//! `notify_data_set_changed` or to [`ListLayout::set_adapter`], and every rebuild recreates
//! all children from the current data.
//!
//! # Public API Overview
//! - Implement [`ItemModel`] for each model type and push models into a shared [`Items`].
//! - Implement [`ItemViewBinder`] per model type and register binders on a
//!   [`MultiTypeAdapter`], one-to-one with `register` or one-to-many with `register_many`.
//! - Attach the adapter to a [`ListLayout`] and render it like any other [`Component`].
//! - Any other [`Adapter`] implementation can drive a [`ListLayout`] as well.

#![allow(clippy::new_ret_no_self, clippy::type_complexity)]

pub mod config;
pub mod error;
pub mod logging;

pub mod core;
pub mod multitype;
pub mod runtime;
pub mod widgets;

/// Error type shared by every fallible operation.
pub use crate::error::{ListLayoutError, Result};

/// Model, identity and sequence types.
pub use crate::core::model::{downcast_model, view_as, AsAny, ItemId, ItemModel, ItemRc, Items, TypeTag};

/// Item view traits and sizing.
pub use crate::core::component::{ClickHandler, Component, Dimension, ItemView, LayoutParams};
pub use crate::core::context::RenderContext;

/// Multi-type dispatch.
pub use crate::multitype::{
    AdapterRef, AdapterSlot, ItemViewBinder, Linker, MultiTypeAdapter, MultiTypePool,
    OneToManyBuilder, OneToManyFlow, SharedTypePool, TypeEntry, TypePool,
};

/// Adapter contract, view holders and the list layout.
pub use crate::runtime::{
    Adapter, AdapterDataObservable, AdapterDataObserver, ChildInfo, ItemSlot, ListLayout,
    Payload, ViewHolder,
};

/// Built-in item views.
pub use crate::widgets::TextView;

/// Display-width helpers.
pub use crate::core::text::width::{clip_to_width, fit_to_width, visible_width};
pub use crate::core::text::wrap::wrap_text;
