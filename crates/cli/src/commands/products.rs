//! Catalog listing.

use clap::Args;
use serde::Deserialize;

use super::{AdminServer, CliError};

/// Filters for `homare products`.
#[derive(Debug, Args)]
pub struct ProductsArgs {
    /// Title keyword (case-insensitive)
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// Only titles containing a Latin letter
    #[arg(long)]
    pub latin_only: bool,

    /// Exact collection title
    #[arg(short, long)]
    pub collection: Option<String>,

    /// Page number (50 products per page)
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,
}

impl ProductsArgs {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("page", self.page.to_string())];
        if let Some(keyword) = &self.keyword {
            query.push(("keyword", keyword.clone()));
        }
        if self.latin_only {
            query.push(("latin_only", "true".to_string()));
        }
        if let Some(collection) = &self.collection {
            query.push(("collection", collection.clone()));
        }
        query
    }
}

/// Product entry returned by `/api/products`.
#[derive(Debug, Deserialize)]
pub struct ProductSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub collections: Vec<String>,
    pub admin_url: String,
}

/// Response of `/api/products`.
#[derive(Debug, Deserialize)]
pub struct ProductList {
    pub products: Vec<ProductSummary>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

impl AdminServer {
    /// Fetch one page of the filtered catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn products(&self, args: &ProductsArgs) -> Result<ProductList, CliError> {
        let response = self
            .client
            .get(self.url("/api/products"))
            .query(&args.query())
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }
}

/// List products.
pub async fn list(server: &AdminServer, args: &ProductsArgs) -> Result<(), CliError> {
    let list = server.products(args).await?;

    for product in &list.products {
        tracing::info!("{}  {}", product.id, product.title);
        if !product.collections.is_empty() {
            tracing::info!("    collections: {}", product.collections.join(", "));
        }
        tracing::info!("    {}", product.admin_url);
    }
    tracing::info!(
        "Page {}/{} ({} products)",
        list.page,
        list.total_pages,
        list.total
    );
    Ok(())
}
