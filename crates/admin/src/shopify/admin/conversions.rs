//! Type conversions from GraphQL response types to domain types.

use homare_core::{CollectionGid, ProductGid};

use crate::shopify::types::{CatalogPage, CatalogProduct, Collection, ProductContext};

use super::queries::{get_product, get_products};

// =============================================================================
// GetProduct conversions
// =============================================================================

pub fn convert_product_context(product: get_product::Product) -> Option<ProductContext> {
    let id = match ProductGid::parse(&product.id) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(id = %product.id, error = %e, "Skipping product with malformed ID");
            return None;
        }
    };

    Some(ProductContext {
        id,
        title: product.title,
        description_html: product.description_html,
    })
}

// =============================================================================
// GetProducts conversions
// =============================================================================

pub fn convert_catalog_page(connection: get_products::ProductConnection) -> CatalogPage {
    let end_cursor = connection.edges.last().map(|e| e.cursor.clone());

    let products = connection
        .edges
        .into_iter()
        .filter_map(|edge| convert_catalog_product(edge.node))
        .collect();

    CatalogPage {
        products,
        has_next_page: connection.page_info.has_next_page,
        end_cursor,
    }
}

fn convert_catalog_product(node: get_products::ProductNode) -> Option<CatalogProduct> {
    let id = match ProductGid::parse(&node.id) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(id = %node.id, error = %e, "Skipping product with malformed ID");
            return None;
        }
    };

    let collections = node
        .collections
        .edges
        .into_iter()
        .filter_map(|e| {
            CollectionGid::parse(&e.node.id).ok().map(|id| Collection {
                id,
                title: e.node.title,
            })
        })
        .collect();

    Some(CatalogProduct {
        id,
        title: node.title,
        description_html: node.description_html,
        collections,
        image_url: node.images.edges.into_iter().next().map(|e| e.node.url),
        fulfillment_service: node
            .variants
            .edges
            .into_iter()
            .next()
            .and_then(|e| e.node.fulfillment_service)
            .map(|f| f.handle),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn connection(json: serde_json::Value) -> get_products::ProductConnection {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_convert_catalog_page() {
        let page = convert_catalog_page(connection(serde_json::json!({
            "edges": [
                {
                    "cursor": "c1",
                    "node": {
                        "id": "gid://shopify/Product/1",
                        "title": "Widget",
                        "descriptionHtml": "<p>w</p>",
                        "collections": {"edges": [
                            {"node": {"id": "gid://shopify/Collection/7", "title": "Kitchen"}}
                        ]},
                        "images": {"edges": [{"node": {"url": "https://cdn.example/w.jpg"}}]},
                        "variants": {"edges": [
                            {"node": {"fulfillmentService": {"handle": "dsers-fulfillment-service"}}}
                        ]}
                    }
                },
                {
                    "cursor": "c2",
                    "node": {"id": "gid://shopify/Product/2", "title": "Gadget"}
                }
            ],
            "pageInfo": {"hasNextPage": true}
        })));

        assert!(page.has_next_page);
        assert_eq!(page.end_cursor.as_deref(), Some("c2"));
        assert_eq!(page.products.len(), 2);

        let widget = &page.products[0];
        assert_eq!(widget.id.numeric(), "1");
        assert!(widget.in_collection("Kitchen"));
        assert_eq!(widget.image_url.as_deref(), Some("https://cdn.example/w.jpg"));
        assert_eq!(
            widget.fulfillment_service.as_deref(),
            Some("dsers-fulfillment-service")
        );

        let gadget = &page.products[1];
        assert!(gadget.collections.is_empty());
        assert!(gadget.fulfillment_service.is_none());
    }

    #[test]
    fn test_malformed_product_id_is_skipped() {
        let page = convert_catalog_page(connection(serde_json::json!({
            "edges": [{"cursor": "c1", "node": {"id": "gid://shopify/Order/1", "title": "Bad"}}],
            "pageInfo": {"hasNextPage": false}
        })));
        assert!(page.products.is_empty());
        assert_eq!(page.end_cursor.as_deref(), Some("c1"));
    }

    #[test]
    fn test_empty_page_has_no_cursor() {
        let page = convert_catalog_page(connection(serde_json::json!({
            "edges": [],
            "pageInfo": {"hasNextPage": false}
        })));
        assert!(page.end_cursor.is_none());
    }
}
