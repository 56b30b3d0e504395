//! Core types shared by the multi-type layer and the list layout.

pub mod component;
pub mod context;
pub mod model;
pub mod text;
