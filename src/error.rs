use thiserror::Error;

pub type Result<T> = std::result::Result<T, ListLayoutError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ListLayoutError {
    /// No registration matched the model's own tag or any of its fallbacks.
    #[error("Have you registered {type_name} to a binder in the adapter/pool?")]
    BinderNotFound { type_name: &'static str },

    #[error("variant {selected} is out of the registered binders' bounds {binders:?}")]
    VariantOutOfBounds {
        selected: String,
        binders: Vec<&'static str>,
    },

    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("position {position} is out of bounds for {len} items")]
    PositionOutOfBounds { position: usize, len: usize },

    #[error("item view type {item_view_type} is out of bounds for {len} registered binders")]
    ViewTypeOutOfBounds { item_view_type: usize, len: usize },

    #[error("binder expected a {expected} model but was handed {found}")]
    ModelMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("view holder was not created by binder {binder}")]
    ViewMismatch { binder: &'static str },

    #[error("binder {binder} is not attached to a MultiTypeAdapter; register it before asking for its adapter")]
    BinderDetached { binder: &'static str },

    #[error("list layout rebuild requested while a rebuild is already running")]
    ReentrantRebuild,
}

impl ListLayoutError {
    #[must_use]
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Whether the error signals a missing registration rather than a configuration bug.
    pub fn is_binder_not_found(&self) -> bool {
        matches!(self, Self::BinderNotFound { .. })
    }
}
