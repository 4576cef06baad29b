//! Homare Core - Shared types library.
//!
//! This crate provides common types used across the catalog rewriter:
//! - `admin` - Back-office server (catalog picklist, rewrite pipeline)
//! - `cli` - Command-line dispatcher for listing and batch rewrites
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Shopify global IDs and rewrite templates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
