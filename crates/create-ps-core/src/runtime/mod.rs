//! External tool detection and execution
//!
//! This module provides:
//! - Detection of the package manager and version control tools
//! - A tokio-backed [`crate::collab::CommandRunner`]

pub mod check;
pub mod tool;

pub use check::{author_name, check_tool, ToolInfo};
pub use tool::ProcessRunner;
