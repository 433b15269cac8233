// Cozy Hub local persistence
// Key-value backends and the JSON persistence adapter on top of them.

pub mod kv_store;
pub mod persistence;
