//! Restoring a previously saved draft at startup.
//!
//! A draft is a JSON document holding prior field values and the list of
//! activity entries to rebuild the repeatable blocks from.

mod error;
mod prefill;

pub use error::PrefillError;
pub use prefill::{Prefill, load_prefill};
