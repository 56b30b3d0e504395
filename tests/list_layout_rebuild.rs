
use std::cell::RefCell;
use std::rc::Rc;

use fixture::{layout, text_at, ClickableStrBinder, Number, NumberBinder, Str, StrBinder};
use list_layout::config::EnvConfig;
use list_layout::{
    Adapter, AdapterRef, AdapterSlot, Component, Items, ItemSlot, ItemViewBinder, ListLayout,
    ListLayoutError, MultiTypeAdapter, RenderContext, TextView,
};
use pretty_assertions::assert_eq;

fn adapter_with(items: &Items) -> Rc<MultiTypeAdapter> {
    let adapter = MultiTypeAdapter::with_capacity(items.clone(), 2);
    adapter.register::<Str, _>(StrBinder);
    adapter.register::<Number, _>(NumberBinder);
    adapter
}

#[test]
fn consecutive_rebuilds_are_identical() {
    let items = Items::new();
    items.push(Str("one"));
    items.push(Number(2));
    items.push(Str("three"));

    let adapter = adapter_with(&items);
    let mut layout = layout();
    layout.set_adapter(adapter.clone()).expect("attach");

    adapter.notify_data_set_changed().expect("first rebuild");
    let first = layout.children();
    adapter.notify_data_set_changed().expect("second rebuild");
    let second = layout.children();

    assert_eq!(first, second);
    assert_eq!(layout.rebuild_count(), 3);
}

#[test]
fn rebuild_reflects_items_mutated_since_last_notification() {
    let items = Items::new();
    items.push(Str("a"));

    let adapter = adapter_with(&items);
    let mut layout = layout();
    layout.set_adapter(adapter.clone()).expect("attach");

    items.insert(0, Number(9));
    items.push(Str("z"));
    assert_eq!(layout.child_count(), 1);

    adapter.notify_data_set_changed().expect("rebuild");
    assert_eq!(layout.child_count(), 3);
    assert_eq!(text_at(&layout, 0).as_deref(), Some("0=9"));
    assert_eq!(text_at(&layout, 2).as_deref(), Some("z"));

    items.clear();
    adapter.notify_data_set_changed().expect("rebuild");
    assert!(layout.is_empty());
}

#[test]
fn binders_read_their_own_position() {
    let items = Items::new();
    for value in [5, 6, 7] {
        items.push(Number(value));
    }

    let adapter = adapter_with(&items);
    let mut layout = layout();
    layout.set_adapter(adapter).expect("attach");

    let texts: Vec<_> = (0..3).filter_map(|position| text_at(&layout, position)).collect();
    assert_eq!(texts, vec!["0=5", "1=6", "2=7"]);
}

#[test]
fn notify_without_observers_does_nothing() {
    let items = Items::new();
    items.push(Str("idle"));
    let adapter = adapter_with(&items);

    assert!(!adapter.has_observers());
    assert_eq!(adapter.notify_data_set_changed(), Ok(()));
}

#[test]
fn reattaching_and_detaching_manage_the_subscription() {
    let items = Items::new();
    items.push(Str("a"));
    let first = adapter_with(&items);
    let second = adapter_with(&items);

    let mut layout = layout();
    layout.set_adapter(first.clone()).expect("attach first");
    layout.set_adapter(first.clone()).expect("attach first again");
    assert_eq!(first.observable().observer_count(), 1);
    assert_eq!(layout.rebuild_count(), 2);

    layout.set_adapter(second.clone()).expect("attach second");
    assert!(!first.has_observers());
    assert!(second.has_observers());

    first.notify_data_set_changed().expect("stale adapter notify");
    assert_eq!(layout.rebuild_count(), 3);

    let detached = layout
        .detach_adapter()
        .expect("detach")
        .expect("adapter was attached");
    assert_eq!(detached.item_count(), 1);
    assert!(!second.has_observers());
    assert!(layout.adapter().is_none());
    assert!(layout.is_empty());
}

#[test]
fn host_recovers_the_attached_dispatcher() {
    let mut layout = layout();
    let attached: Rc<dyn Adapter> = MultiTypeAdapter::new();
    layout.set_adapter(attached).expect("attach");
    assert!(layout.is_empty());

    let dispatcher = layout
        .adapter_as::<MultiTypeAdapter>()
        .expect("attached adapter is a MultiTypeAdapter");
    dispatcher.register::<Str, _>(StrBinder);
    let items = Items::new();
    items.push(Str("late"));
    dispatcher.set_items(items);
    dispatcher.notify_data_set_changed().expect("notify");

    assert_eq!(layout.child_count(), 1);
    assert_eq!(text_at(&layout, 0).as_deref(), Some("late"));
}

#[test]
fn binder_click_handlers_reach_the_layout() {
    let clicked = Rc::new(RefCell::new(Vec::new()));
    let items = Items::new();
    items.push(Str("first"));
    items.push(Number(1));
    items.push(Str("third"));

    let adapter = MultiTypeAdapter::with_capacity(items, 2);
    adapter.register::<Str, _>(ClickableStrBinder {
        clicked: Rc::clone(&clicked),
    });
    adapter.register::<Number, _>(NumberBinder);

    let mut layout = layout();
    layout.set_adapter(adapter).expect("attach");

    assert!(layout.perform_item_click(2));
    assert!(layout.perform_item_click(0));
    assert!(layout.perform_item_click(2));
    assert!(!layout.perform_item_click(1));
    assert!(!layout.perform_item_click(3));
    assert_eq!(*clicked.borrow(), vec!["third", "first", "third"]);
}

#[test]
fn layout_renders_children_in_order() {
    let items = Items::new();
    items.push(Str("hello world"));
    items.push(Number(3));

    let adapter = adapter_with(&items);
    let mut layout = layout();
    layout.set_adapter(adapter).expect("attach");

    assert_eq!(layout.render(6), vec!["hello ", "world ", "1=3   "]);
}

struct ReentrantBinder {
    adapter: AdapterSlot,
    seen: Rc<RefCell<Vec<ListLayoutError>>>,
}

impl ItemViewBinder<Str> for ReentrantBinder {
    type View = TextView;

    fn create_view(&self, _ctx: &RenderContext) -> TextView {
        TextView::new("")
    }

    fn bind(&self, slot: &mut ItemSlot<'_, TextView>, item: &Str) {
        slot.view_mut().set_text(item.0);
        let result = self
            .adapter
            .get()
            .and_then(|adapter| adapter.notify_data_set_changed());
        if let Err(err) = result {
            self.seen.borrow_mut().push(err);
        }
    }

    fn on_attach(&self, adapter: &AdapterRef) {
        self.adapter.attach(adapter);
    }
}

#[test]
fn notifying_from_inside_a_rebuild_is_rejected() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let items = Items::new();
    items.push(Str("loop"));

    let adapter = MultiTypeAdapter::with_capacity(items, 1);
    adapter.register::<Str, _>(ReentrantBinder {
        adapter: AdapterSlot::for_binder::<ReentrantBinder>(),
        seen: Rc::clone(&seen),
    });

    let mut layout = layout();
    layout.set_adapter(adapter).expect("attach");

    assert_eq!(*seen.borrow(), vec![ListLayoutError::ReentrantRebuild]);
    assert_eq!(layout.child_count(), 1);
    assert_eq!(layout.rebuild_count(), 1);
}

#[test]
fn debug_rebuild_logging_does_not_change_results() {
    let items = Items::new();
    items.push(Str("traced"));
    let adapter = adapter_with(&items);

    let config = EnvConfig {
        debug_rebuild: true,
        ..EnvConfig::default()
    };
    let mut traced = ListLayout::with_config(&config);
    let mut plain = layout();
    traced.set_adapter(adapter.clone()).expect("attach traced");
    plain.set_adapter(adapter).expect("attach plain");

    assert_eq!(traced.children(), plain.children());
    assert_eq!(traced.render(8), plain.render(8));
}
