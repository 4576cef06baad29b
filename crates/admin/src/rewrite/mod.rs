//! Product copy rewriting.
//!
//! One product flows through: fetch context, build prompt, generate, parse
//! and normalize, then write back in two phases (`productUpdate`, then
//! `metafieldsSet`). Batches run the flow sequentially and isolate failures
//! per product.

mod content;
mod parse;
mod pipeline;
mod prompt;
mod writer;

pub use content::{Breadcrumbs, GeneratedContent, Specs, metafield_entries};
pub use parse::{
    DISCLAIMER_HTML, ParseError, extract_json_slice, normalize_disclaimer, parse_generated,
};
pub use pipeline::{BatchReport, FailedProduct, RewriteError, RewriteRequest, Rewriter, Stage};
pub use prompt::build_prompt;
pub use writer::write_product;
