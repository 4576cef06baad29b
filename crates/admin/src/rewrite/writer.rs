//! Two-phase write of generated content back to the catalog.

use tracing::instrument;

use homare_core::{ProductGid, RewriteTemplate};

use crate::shopify::{AdminClient, AdminShopifyError, format_user_errors};

use super::content::{Breadcrumbs, GeneratedContent, metafield_entries};
use super::pipeline::RewriteError;

/// Write generated content: `productUpdate`, then `metafieldsSet`.
///
/// Non-empty `userErrors` from either mutation abort the write. A failed
/// metafield write does not roll back the product update. The metafield call
/// is skipped when no entry has a value.
///
/// # Errors
///
/// Returns `RewriteError::ProductUpdate` or `RewriteError::MetafieldsSet`
/// naming the phase that failed.
#[instrument(skip(client, content, breadcrumbs), fields(product_id = %id))]
pub async fn write_product(
    client: &AdminClient,
    id: &ProductGid,
    content: &GeneratedContent,
    template: Option<RewriteTemplate>,
    breadcrumbs: &Breadcrumbs,
) -> Result<(), RewriteError> {
    let payload = client
        .update_product(content.to_product_update(id, template))
        .await
        .map_err(RewriteError::ProductUpdate)?;
    if !payload.user_errors.is_empty() {
        return Err(RewriteError::ProductUpdate(AdminShopifyError::UserError(
            format_user_errors(&payload.user_errors),
        )));
    }

    let entries = metafield_entries(id, &content.specs, breadcrumbs);
    if entries.is_empty() {
        tracing::debug!("No metafield values, skipping metafieldsSet");
        return Ok(());
    }

    let payload = client
        .set_metafields(entries)
        .await
        .map_err(RewriteError::MetafieldsSet)?;
    if !payload.user_errors.is_empty() {
        return Err(RewriteError::MetafieldsSet(AdminShopifyError::UserError(
            format_user_errors(&payload.user_errors),
        )));
    }

    Ok(())
}
