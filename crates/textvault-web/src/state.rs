use textvault_core::Coordinator;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub coordinator: Coordinator,
}
