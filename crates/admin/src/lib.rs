//! Homare admin library.
//!
//! This crate provides the back-office functionality as a library,
//! allowing it to be tested and reused.
//!
//! # Security
//!
//! This crate contains HIGH PRIVILEGE access:
//! - Shopify Admin API (product writes)
//! - `OpenAI` API (billed per request)
//!
//! Only deploy on private infrastructure.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod openai;
pub mod rewrite;
pub mod routes;
pub mod shopify;
pub mod state;
