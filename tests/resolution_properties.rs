
use fixture::{layout, Number, NumberBinder, Str, StrBinder};
use list_layout::{
    Adapter, ItemModel, ItemSlot, ItemViewBinder, Items, MultiTypeAdapter, RenderContext, TextView,
};
use proptest::prelude::*;

struct Variant {
    kind: u8,
}

impl ItemModel for Variant {}

struct VariantBinder(u8);

impl ItemViewBinder<Variant> for VariantBinder {
    type View = TextView;

    fn create_view(&self, _ctx: &RenderContext) -> TextView {
        TextView::new("")
    }

    fn bind(&self, slot: &mut ItemSlot<'_, TextView>, item: &Variant) {
        slot.view_mut()
            .set_text(format!("binder {} kind {}", self.0, item.kind));
    }
}

#[derive(Clone, Debug)]
enum Registration {
    Single(u8),
    Group(u8),
}

fn arb_registration() -> impl Strategy<Value = Registration> {
    prop_oneof![
        (0u8..8).prop_map(Registration::Single),
        (1u8..5).prop_map(Registration::Group),
    ]
}

fn register_group(adapter: &MultiTypeAdapter, size: u8) {
    let mut builder = adapter.register_many::<Variant>().to(0u8, VariantBinder(0));
    for key in 1..size {
        builder = builder.to(key, VariantBinder(key));
    }
    builder
        .with_selector(move |_, variant: &Variant| variant.kind % size)
        .expect("group registration");
}

fn apply(adapter: &MultiTypeAdapter, registration: &Registration) {
    match registration {
        Registration::Single(tag) => {
            adapter.register::<Variant, _>(VariantBinder(*tag));
        }
        Registration::Group(size) => register_group(adapter, *size),
    }
}

proptest! {
    /// The last one-to-one registration of a model always owns its resolution.
    #[test]
    fn last_one_to_one_registration_wins(
        history in prop::collection::vec(arb_registration(), 0..6),
        with_str in any::<bool>(),
    ) {
        let items = Items::new();
        items.push(Variant { kind: 3 });
        let adapter = MultiTypeAdapter::with_capacity(items, 8);
        if with_str {
            adapter.register::<Str, _>(StrBinder);
        }
        for registration in &history {
            apply(&adapter, registration);
        }
        adapter.register::<Variant, _>(VariantBinder(99));

        let expected = usize::from(with_str);
        prop_assert_eq!(adapter.item_view_type(0), Ok(expected));
        prop_assert_eq!(adapter.type_pool().borrow().size(), expected + 1);

        let mut layout = layout();
        layout.set_adapter(adapter).expect("attach");
        let text = layout
            .with_child(0, |child| child.view::<TextView>().map(|view| view.text().to_string()))
            .flatten();
        prop_assert_eq!(text.as_deref(), Some("binder 99 kind 3"));
    }

    /// Inside a one-to-many group the resolved type is the group base plus the selected offset.
    #[test]
    fn group_resolution_is_base_plus_offset(
        size in 1u8..6,
        prefix in 0usize..3,
        kinds in prop::collection::vec(any::<u8>(), 1..12),
    ) {
        let items = Items::new();
        for kind in &kinds {
            items.push(Variant { kind: *kind });
        }
        let adapter = MultiTypeAdapter::with_capacity(items, 8);
        if prefix > 0 {
            adapter.register::<Str, _>(StrBinder);
        }
        if prefix > 1 {
            adapter.register::<Number, _>(NumberBinder);
        }
        register_group(&adapter, size);

        for (position, kind) in kinds.iter().enumerate() {
            let offset = usize::from(kind % size);
            prop_assert_eq!(adapter.item_view_type(position), Ok(prefix + offset));
        }
    }

    /// Two rebuilds over unchanged data yield the same (view type, id) per position.
    #[test]
    fn rebuilds_are_deterministic(values in prop::collection::vec(prop::option::of(0u64..50), 0..16)) {
        let items = Items::new();
        for value in &values {
            match value {
                Some(number) => items.push(Number(*number)),
                None => items.push(Str("text")),
            }
        }
        let adapter = MultiTypeAdapter::with_capacity(items, 2);
        adapter.register::<Number, _>(NumberBinder);
        adapter.register::<Str, _>(StrBinder);

        let mut layout = layout();
        layout.set_adapter(adapter.clone()).expect("attach");
        let first = layout.children();
        adapter.notify_data_set_changed().expect("rebuild");
        let second = layout.children();

        prop_assert_eq!(first.len(), values.len());
        prop_assert_eq!(first, second);
    }
}
