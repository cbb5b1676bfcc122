//! Provider API models and their CodeMeta mappings.

mod github;
mod gitlab;

pub use github::*;
pub use gitlab::*;
