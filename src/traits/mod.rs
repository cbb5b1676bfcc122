//! Trait definitions for provider operations.
//!
//! Each provider model implements the traits its endpoints support,
//! encapsulating the API differences in the implementations.

mod fetch;
mod list;

pub use fetch::Fetch;
pub use list::{List, DEFAULT_PAGE_SIZE};
