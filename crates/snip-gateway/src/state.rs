use std::sync::Arc;

use snip_core::LinkManager;

#[derive(Clone)]
pub struct AppState {
    manager: Arc<dyn LinkManager>,
}

impl AppState {
    pub fn new(manager: Arc<dyn LinkManager>) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &dyn LinkManager {
        self.manager.as_ref()
    }
}
