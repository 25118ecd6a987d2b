//! Cache-related MCP tools.
//!
//! This module provides tools for inspecting and resetting the page cache.

pub mod clear;
pub mod list;

pub use clear::clear_impl;
pub use list::list_impl;
