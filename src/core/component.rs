//! Component and ItemView traits.

use crate::core::model::AsAny;

/// Renderable component interface.
pub trait Component {
    /// Render to a list of lines at the given width.
    fn render(&mut self, width: usize) -> Vec<String>;

    /// Invalidate any cached state.
    fn invalidate(&mut self) {}
}

/// Size request along one axis.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Dimension {
    /// Fill the parent's extent.
    #[default]
    MatchParent,
    /// Use the content's own extent.
    WrapContent,
    /// Fixed number of columns or rows.
    Exact(usize),
}

/// Sizing a child requests from its container.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LayoutParams {
    pub width: Dimension,
    pub height: Dimension,
}

impl LayoutParams {
    pub fn new(width: Dimension, height: Dimension) -> Self {
        Self { width, height }
    }
}

/// Full width, content height.
impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            width: Dimension::MatchParent,
            height: Dimension::WrapContent,
        }
    }
}

/// Click callback attached to an item by its binder.
pub type ClickHandler = Box<dyn FnMut()>;

/// A component that can be placed in a list as one item.
pub trait ItemView: Component + AsAny {
    /// Layout params the view was created with. `None` lets the container pick its default.
    fn layout_params(&self) -> Option<LayoutParams> {
        None
    }
}
