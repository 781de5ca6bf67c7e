use crate::persona::generator::PersonaGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; requests share nothing else.
#[derive(Clone)]
pub struct AppState {
    pub generator: PersonaGenerator,
}
