//! Batch rewrite of products.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use homare_core::{ProductGid, RewriteTemplate};

use crate::openai::{ChatClient, OpenAiError};
use crate::shopify::{AdminClient, AdminShopifyError};

use super::content::Breadcrumbs;
use super::parse::{ParseError, parse_generated};
use super::prompt::build_prompt;
use super::writer::write_product;

/// Step of the per-product flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Reading the product's current title and description.
    Fetch,
    /// Calling the chat completion API.
    Generate,
    /// Extracting JSON from the model output.
    Parse,
    /// `productUpdate` mutation.
    ProductUpdate,
    /// `metafieldsSet` mutation.
    MetafieldsSet,
}

impl Stage {
    /// Returns the stage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Generate => "generate",
            Self::Parse => "parse",
            Self::ProductUpdate => "product_update",
            Self::MetafieldsSet => "metafields_set",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why one product of a batch was not rewritten.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// The product does not exist.
    #[error("product not found")]
    NotFound,

    /// Reading the product failed.
    #[error("failed to fetch product: {0}")]
    Fetch(#[source] AdminShopifyError),

    /// The chat completion call failed.
    #[error("text generation failed: {0}")]
    Generate(#[from] OpenAiError),

    /// The model output could not be parsed.
    #[error("unusable model output: {0}")]
    Parse(#[from] ParseError),

    /// `productUpdate` failed or returned user errors.
    #[error("product update failed: {0}")]
    ProductUpdate(#[source] AdminShopifyError),

    /// `metafieldsSet` failed or returned user errors.
    #[error("metafield update failed: {0}")]
    MetafieldsSet(#[source] AdminShopifyError),
}

impl RewriteError {
    /// The stage the product failed in.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::NotFound | Self::Fetch(_) => Stage::Fetch,
            Self::Generate(_) => Stage::Generate,
            Self::Parse(_) => Stage::Parse,
            Self::ProductUpdate(_) => Stage::ProductUpdate,
            Self::MetafieldsSet(_) => Stage::MetafieldsSet,
        }
    }
}

/// A batch of products to rewrite with one template.
#[derive(Debug, Clone, Default)]
pub struct RewriteRequest {
    /// Products to rewrite, in order.
    pub ids: Vec<ProductGid>,
    /// Template name, also written as the template suffix.
    pub template: RewriteTemplate,
    /// Breadcrumb categories applied to every product.
    pub breadcrumbs: Breadcrumbs,
}

/// A product that was not rewritten.
#[derive(Debug, Clone, Serialize)]
pub struct FailedProduct {
    /// Product ID.
    pub product_id: ProductGid,
    /// Stage it failed in.
    pub stage: Stage,
    /// Error message.
    pub error: String,
}

/// Outcome of a batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Batch identifier used in logs.
    pub batch_id: Uuid,
    /// When the first product was started.
    pub started_at: DateTime<Utc>,
    /// When the last product finished.
    pub finished_at: DateTime<Utc>,
    /// Number of products requested.
    pub requested: usize,
    /// Number of products that completed both writes.
    pub succeeded: usize,
    /// Products that did not.
    pub failures: Vec<FailedProduct>,
}

/// Runs the rewrite flow against the catalog and the chat API.
#[derive(Clone, Copy)]
pub struct Rewriter<'a> {
    shopify: &'a AdminClient,
    openai: &'a ChatClient,
}

impl<'a> Rewriter<'a> {
    /// Create a rewriter over shared clients.
    #[must_use]
    pub const fn new(shopify: &'a AdminClient, openai: &'a ChatClient) -> Self {
        Self { shopify, openai }
    }

    /// Rewrite every product of a batch, one at a time.
    ///
    /// A failing product is logged and recorded; the batch always completes.
    #[instrument(skip(self, request), fields(batch_id, requested = request.ids.len(), template = %request.template))]
    pub async fn run_batch(&self, request: RewriteRequest) -> BatchReport {
        let batch_id = Uuid::new_v4();
        let started_at = Utc::now();
        tracing::Span::current().record("batch_id", tracing::field::display(batch_id));

        let mut succeeded = 0;
        let mut failures = Vec::new();

        for id in &request.ids {
            match self
                .rewrite_product(id, request.template, &request.breadcrumbs)
                .await
            {
                Ok(()) => succeeded += 1,
                Err(e) => {
                    tracing::warn!(
                        product_id = %id,
                        stage = %e.stage(),
                        error = %e,
                        "Product rewrite failed"
                    );
                    failures.push(FailedProduct {
                        product_id: id.clone(),
                        stage: e.stage(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let finished_at = Utc::now();
        tracing::info!(
            succeeded,
            failed = failures.len(),
            elapsed_ms = (finished_at - started_at).num_milliseconds(),
            "Bulk rewrite completed"
        );

        BatchReport {
            batch_id,
            started_at,
            finished_at,
            requested: request.ids.len(),
            succeeded,
            failures,
        }
    }

    /// Rewrite one product: fetch, generate, parse, write.
    ///
    /// # Errors
    ///
    /// Returns a `RewriteError` naming the stage that failed.
    #[instrument(skip(self, breadcrumbs), fields(product_id = %id))]
    pub async fn rewrite_product(
        &self,
        id: &ProductGid,
        template: RewriteTemplate,
        breadcrumbs: &Breadcrumbs,
    ) -> Result<(), RewriteError> {
        let product = self
            .shopify
            .get_product(id)
            .await
            .map_err(RewriteError::Fetch)?
            .ok_or(RewriteError::NotFound)?;

        let prompt = build_prompt(&product.title, &product.description_html, Some(template));
        let raw = self.openai.complete(prompt).await?;
        let content = parse_generated(&raw)?;

        write_product(self.shopify, id, &content, Some(template), breadcrumbs).await?;

        tracing::debug!(title = %content.title, "Product rewritten");
        Ok(())
    }

    /// Generate content for a title and description without touching the
    /// catalog. Returns the raw model output.
    ///
    /// # Errors
    ///
    /// Returns an error if the chat completion call fails.
    #[instrument(skip(self, title, description_html))]
    pub async fn generate(
        &self,
        title: &str,
        description_html: &str,
    ) -> Result<String, OpenAiError> {
        self.openai
            .complete(build_prompt(title, description_html, None))
            .await
    }
}
