//! MCP Business Assistant
//!
//! Simulates a set of connected business tools and answers free-text
//! queries with canned reports built from mock data. The core is the
//! [`catalog::ToolCatalog`] and the [`router::QueryRouter`]; the
//! [`crate::core::server`] module exposes them as MCP tools over STDIO and HTTP.

pub mod catalog;
pub mod core;
pub mod dashboard;
pub mod report;
pub mod router;
pub mod session;
pub mod tools;

pub use crate::catalog::{ConnectionSet, ToolCatalog, ToolDescriptor, ToolId, ToolRecord};
pub use crate::core::error::{AssistantError, Result};
pub use crate::router::{Intent, QueryRouter};
pub use crate::session::{QueryLog, QueryLogEntry, Session, SessionStore};
