/// Core Server Framework Module
///
/// This module contains the server plumbing around the assistant:
/// - server.rs: MCP server implementation with HTTP and STDIO transport
/// - utils.rs: Configuration and environment handling
/// - error.rs: Error types

pub mod error;
pub mod server;
pub mod utils;
