#![allow(unused_imports)]

use list_layout::config::EnvConfig;
use list_layout::logging::{init, RebuildLogger};
use list_layout::multitype::{BinderRc, ErasedBinder, SelectorLinker};
use list_layout::runtime::{AdapterSubscription, ObserverRc};
use list_layout::{
    clip_to_width, downcast_model, fit_to_width, view_as, visible_width, wrap_text, Adapter,
    AdapterDataObservable, AdapterDataObserver, AdapterRef, AdapterSlot, AsAny, ChildInfo,
    ClickHandler, Component, Dimension, ItemId, ItemModel, ItemRc, ItemSlot, ItemView,
    ItemViewBinder, Items, LayoutParams, Linker, ListLayout, ListLayoutError, MultiTypeAdapter,
    MultiTypePool, OneToManyBuilder, OneToManyFlow, Payload, RenderContext, Result,
    SharedTypePool, TextView, TypeEntry, TypePool, TypeTag, ViewHolder,
};

#[test]
fn public_api_exports_compile() {}

#[test]
fn default_layout_params_fill_width_and_wrap_height() {
    assert_eq!(
        LayoutParams::default(),
        LayoutParams::new(Dimension::MatchParent, Dimension::WrapContent)
    );
}
