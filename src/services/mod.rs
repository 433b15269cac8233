// Cozy Hub services
// Stateless or self-contained helpers: settings, tag extraction, webpage
// summarization, and the remote-entity sync boundary.

pub mod settings_engine;
pub mod summarizer;
pub mod sync_adapter;
pub mod tag_extractor;
