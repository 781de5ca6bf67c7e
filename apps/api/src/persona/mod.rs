// Persona generation: request composition, the single LLM round trip,
// and the typed profile that comes back.
// All LLM calls go through llm_client; nothing here talks to a vendor directly.

pub mod composer;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod types;
