//! Built-in item views.

pub mod text;

pub use text::TextView;
