use crate::model::DisplayModel;
use std::sync::Arc;
use tokio::sync::watch;

/// The one shared mutable cell of the tray: a pointer to the latest
/// [`DisplayModel`].
///
/// Each refresh publishes a complete model; there are no field-level writes.
/// Readers clone the `Arc` and never observe a half-built model.
#[derive(Debug)]
pub struct StatusPublisher {
    tx: watch::Sender<Arc<DisplayModel>>,
}

impl StatusPublisher {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Arc::new(DisplayModel::default()));
        Self { tx }
    }

    /// Replace the current model. Subscribers are only notified when the new
    /// model differs from the previous one.
    ///
    /// Returns `true` if the model changed.
    pub fn publish(&self, model: DisplayModel) -> bool {
        self.tx.send_if_modified(|current| {
            if **current == model {
                return false;
            }
            *current = Arc::new(model);
            true
        })
    }

    /// The most recently published model.
    pub fn current(&self) -> Arc<DisplayModel> {
        Arc::clone(&self.tx.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<DisplayModel>> {
        self.tx.subscribe()
    }
}

impl Default for StatusPublisher {
    fn default() -> Self {
        Self::new()
    }
}
