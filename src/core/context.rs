//! Render context handed to binders when they create item views.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Opaque capability token supplied by the host container.
///
/// The list layout passes its own context to every `create_view` call. Hosts may attach an
/// arbitrary value (theme, resource table) that binders downcast with [`RenderContext::host`].
#[derive(Clone, Default)]
pub struct RenderContext {
    width_hint: Option<usize>,
    host: Option<Rc<dyn Any>>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_width_hint(mut self, width: usize) -> Self {
        self.width_hint = Some(width);
        self
    }

    pub fn with_host<T: Any>(mut self, host: T) -> Self {
        self.host = Some(Rc::new(host));
        self
    }

    /// Last width the container rendered at, if it has rendered yet.
    pub fn width_hint(&self) -> Option<usize> {
        self.width_hint
    }

    pub(crate) fn set_width_hint(&mut self, width: usize) {
        self.width_hint = Some(width);
    }

    pub fn host<T: Any>(&self) -> Option<&T> {
        self.host.as_deref().and_then(|host| host.downcast_ref::<T>())
    }
}

impl fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("width_hint", &self.width_hint)
            .field("has_host", &self.host.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::RenderContext;

    #[test]
    fn host_value_downcasts_by_type() {
        let ctx = RenderContext::new().with_host(String::from("theme"));
        assert_eq!(ctx.host::<String>().map(String::as_str), Some("theme"));
        assert!(ctx.host::<u32>().is_none());
        assert!(ctx.width_hint().is_none());
    }
}
