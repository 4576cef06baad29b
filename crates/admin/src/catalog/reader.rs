//! Full-catalog traversal over the Admin API.

use std::collections::BTreeSet;

use tracing::instrument;

use crate::shopify::{AdminClient, AdminShopifyError, CatalogProduct};

/// Products requested per page.
pub const CATALOG_PAGE_SIZE: i64 = 100;

/// Read every product, following cursors until the last page.
///
/// Products keep server order. When `fulfillment_service` is set, only
/// products whose first variant uses that service handle are kept.
///
/// # Errors
///
/// Fails the whole read if any page request fails or a page has no
/// `products` connection; no partial result is returned.
#[instrument(skip(client))]
pub async fn read_catalog(
    client: &AdminClient,
    fulfillment_service: Option<&str>,
) -> Result<Vec<CatalogProduct>, AdminShopifyError> {
    let mut products = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0_usize;

    loop {
        let page = client.get_products_page(CATALOG_PAGE_SIZE, cursor).await?;
        pages += 1;

        products.extend(page.products.into_iter().filter(|p| {
            fulfillment_service.is_none_or(|handle| p.fulfillment_service.as_deref() == Some(handle))
        }));

        if !page.has_next_page {
            break;
        }
        cursor = page.end_cursor;
        if cursor.is_none() {
            tracing::warn!(pages, "Page reported more results but had no cursor");
            break;
        }
    }

    tracing::debug!(pages, count = products.len(), "Catalog read");
    Ok(products)
}

/// Distinct collection titles across the snapshot, sorted.
#[must_use]
pub fn collection_titles(products: &[CatalogProduct]) -> Vec<String> {
    products
        .iter()
        .flat_map(|p| p.collections.iter().map(|c| c.title.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use homare_core::{CollectionGid, ProductGid};

    use super::*;
    use crate::shopify::Collection;

    fn product(id: u32, collections: &[&str]) -> CatalogProduct {
        CatalogProduct {
            id: ProductGid::parse(&id.to_string()).unwrap(),
            title: format!("Product {id}"),
            description_html: String::new(),
            collections: collections
                .iter()
                .enumerate()
                .map(|(i, title)| Collection {
                    id: CollectionGid::parse(&(i + 1).to_string()).unwrap(),
                    title: (*title).to_string(),
                })
                .collect(),
            image_url: None,
            fulfillment_service: None,
        }
    }

    #[test]
    fn test_collection_titles_are_distinct_and_sorted() {
        let products = [
            product(1, &["Kitchen", "Sale"]),
            product(2, &["Garden", "Kitchen"]),
            product(3, &[]),
        ];
        assert_eq!(collection_titles(&products), ["Garden", "Kitchen", "Sale"]);
    }
}
