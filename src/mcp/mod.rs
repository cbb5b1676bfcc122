//! MCP (Model Context Protocol) server and tool types.
//!
//! Exposes the harvester as two MCP tools so that AI assistants and other
//! MCP hosts can call it without linking the library.
//!
//! # Example
//!
//! ```no_run
//! use githublab_harvest::mcp::HarvestServer;
//!
//! # fn main() -> githublab_harvest::Result<()> {
//! let server = HarvestServer::from_env()?;
//! // Server can now be used with rmcp transport
//! # Ok(())
//! # }
//! ```

mod params;
mod server;

pub use params::*;
pub use server::HarvestServer;
