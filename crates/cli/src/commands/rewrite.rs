//! Bulk rewrite dispatch.

use clap::Args;
use serde::Deserialize;

use homare_core::{ProductGid, RewriteTemplate};

use super::{AdminServer, CliError};

/// Arguments for `homare rewrite`.
#[derive(Debug, Args)]
pub struct RewriteArgs {
    /// Product IDs (numeric or gid://shopify/Product/...)
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Rewrite template (aliexpress, alibaba)
    #[arg(short, long, default_value = "aliexpress")]
    pub template: String,

    /// Top-level breadcrumb category
    #[arg(long)]
    pub cat_big: Option<String>,

    /// Mid-level breadcrumb category
    #[arg(long)]
    pub cat_mid: Option<String>,
}

/// Response of `/api/bulk-rewrite`.
#[derive(Debug, Deserialize)]
pub struct BulkRewriteResponse {
    pub status: String,
    pub count: usize,
}

impl AdminServer {
    /// Send a bulk rewrite request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn bulk_rewrite(
        &self,
        ids: &[ProductGid],
        template: RewriteTemplate,
        cat_big: Option<&str>,
        cat_mid: Option<&str>,
    ) -> Result<BulkRewriteResponse, CliError> {
        let ids = serde_json::to_string(ids)?;
        let mut form = vec![("ids", ids.as_str()), ("template", template.as_str())];
        if let Some(cat_big) = cat_big {
            form.push(("cat_big", cat_big));
        }
        if let Some(cat_mid) = cat_mid {
            form.push(("cat_mid", cat_mid));
        }

        let response = self
            .client
            .post(self.url("/api/bulk-rewrite"))
            .form(&form)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }
}

/// Validate arguments and dispatch the batch.
pub async fn dispatch(server: &AdminServer, args: RewriteArgs) -> Result<usize, CliError> {
    let ids = args
        .ids
        .iter()
        .map(|id| ProductGid::parse(id))
        .collect::<Result<Vec<_>, _>>()?;
    let template: RewriteTemplate = args.template.parse()?;

    tracing::info!(
        "Rewriting {} products with template {}...",
        ids.len(),
        template
    );

    let response = server
        .bulk_rewrite(
            &ids,
            template,
            args.cat_big.as_deref(),
            args.cat_mid.as_deref(),
        )
        .await?;

    tracing::info!("Updated {} of {} products", response.count, ids.len());
    Ok(response.count)
}
