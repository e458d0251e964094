//! Shared application state for axum handlers.

use std::sync::{Arc, Mutex, MutexGuard};

use saferouting_lib::Router as RouteEngine;

/// The routing engine shared by every handler.
///
/// Queries mutate the route cache, so the engine sits behind a mutex and
/// requests are answered one at a time. Cloning only bumps the `Arc`.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<Mutex<RouteEngine>>,
}

impl AppState {
    pub fn new(engine: RouteEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    /// Lock the engine. `None` when a previous holder panicked.
    pub fn lock(&self) -> Option<MutexGuard<'_, RouteEngine>> {
        self.engine.lock().ok()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
