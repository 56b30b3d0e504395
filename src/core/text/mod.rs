//! Text helpers (display width, clipping, wrapping).
//!
//! These helpers are pure (string in/string out) and live under `core` so widgets and the list
//! layout share one notion of column width.

pub mod width;
pub mod wrap;
