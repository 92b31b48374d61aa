//! Feature content and remote templates
//!
//! This module provides:
//! - Static and templated file content for every catalog feature
//! - The HTTP client that fetches remote templates, licenses and registry data

pub mod fetcher;
pub mod render;

pub use fetcher::{HttpRemote, RemoteEndpoints};
pub use render::RenderContext;
