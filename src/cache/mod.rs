//! Cache Module
//!
//! Provides the TTL-emulating cache facade, the envelope codec and the
//! key-to-parameter name mapping.

mod entry;
pub mod naming;
mod param_cache;


// Re-export public types
pub use entry::Envelope;
pub use naming::{escape_key, parameter_name};
pub use param_cache::ParamCache;
