//! Shared application state handed to every axum handler via `State<AppState>`

use std::sync::Arc;

use crate::session::SessionCoordinator;

#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<SessionCoordinator>,
}

impl AppState {
    pub fn new(coordinator: Arc<SessionCoordinator>) -> Self {
        Self { coordinator }
    }
}
