//! Adapter plumbing and the list layout that consumes it.

pub mod adapter;
pub mod list_layout;
pub mod observer;

pub use adapter::{Adapter, ItemSlot, Payload, ViewHolder};
pub use list_layout::{ChildInfo, ListLayout};
pub use observer::{AdapterDataObservable, AdapterDataObserver, AdapterSubscription, ObserverRc};
