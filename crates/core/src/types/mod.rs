//! Core types for the catalog rewriter.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod template;

pub use id::*;
pub use template::{RewriteTemplate, TemplateError};
