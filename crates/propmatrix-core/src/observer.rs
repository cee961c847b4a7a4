//! Container resize observation.

use std::fmt;

/// Host-side source of container resize notifications.
///
/// Observing returns a [`Subscription`]; dropping it disconnects the
/// observer. The host then forwards sizes through
/// [`MatrixView::on_resize`](crate::MatrixView::on_resize).
pub trait ResizeSource {
    fn observe(&self) -> Subscription;
}

/// RAII handle for a registered observer.
pub struct Subscription {
    dispose: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(dispose: impl FnOnce() + 'static) -> Self {
        Self {
            dispose: Some(Box::new(dispose)),
        }
    }

    /// A subscription with nothing to dispose.
    pub fn detached() -> Self {
        Self { dispose: None }
    }

    /// Disposes now instead of on drop.
    pub fn dispose(mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.dispose.is_some())
            .finish()
    }
}
