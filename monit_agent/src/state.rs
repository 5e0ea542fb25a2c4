//! Shared agent state handed to every request: read-only after startup.

use std::sync::Arc;

use crate::gatekeeper::Gatekeeper;
use crate::supervisor::Supervisor;

#[derive(Clone)]
pub struct AppState {
    pub gatekeeper: Gatekeeper,
    pub supervisor: Arc<Supervisor>,
}

impl AppState {
    pub fn new(gatekeeper: Gatekeeper, supervisor: Supervisor) -> Self {
        Self {
            gatekeeper,
            supervisor: Arc::new(supervisor),
        }
    }
}
