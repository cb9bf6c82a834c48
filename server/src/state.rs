use crate::{broker::Broker, store::StateStore};

/// Everything a request handler touches. Built once in `main`.
pub struct AppState {
    pub store: StateStore,
    pub broker: Broker,
}

impl AppState {
    /// Must be called from within the tokio runtime, the broker spawns its loop.
    pub fn new(event_buffer: usize) -> Self {
        Self {
            store: StateStore::new(),
            broker: Broker::new(event_buffer),
        }
    }
}
