use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use simple_mlp::{Gate, Network};

/// What `/train` builds when no saved model exists.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub gate:          Gate,
    pub hidden:        usize,
    pub epochs:        usize,
    pub learning_rate: f64,
    pub model_path:    PathBuf,
}

pub struct ServerState {
    pub settings: ServerSettings,
    /// The most recently trained or restored network.
    pub network:  Option<Network>,
}

impl ServerState {
    pub fn new(settings: ServerSettings) -> Self {
        ServerState { settings, network: None }
    }
}

/// Shared state, cloned into every request thread.
/// Holding the lock serializes training and inference.
pub type SharedState = Arc<Mutex<ServerState>>;

/// Locks the state, recovering the guard if a previous handler panicked.
pub fn lock(state: &SharedState) -> MutexGuard<'_, ServerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
