//! GraphQL operation definitions for Shopify Admin API.
//!
//! Each operation implements `graphql_client::GraphQLQuery` by hand: the
//! document is a static string and the `Variables`/`ResponseData` types live
//! in a module named after the operation, mirroring the layout the
//! `graphql_client` derive would generate.

use graphql_client::{GraphQLQuery, QueryBody};

use crate::shopify::types::{MetafieldsSetPayload, ProductUpdatePayload};

/// Implement `GraphQLQuery` for an operation marker type.
macro_rules! graphql_operation {
    ($name:ident, $module:ident) => {
        impl GraphQLQuery for $name {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $module::QUERY,
                    operation_name: $module::OPERATION_NAME,
                }
            }
        }
    };
}

// =============================================================================
// Product queries
// =============================================================================

/// Fetch one product's rewrite context (title and description).
pub struct GetProduct;
graphql_operation!(GetProduct, get_product);

pub mod get_product {
    use serde::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "GetProduct";
    pub const QUERY: &str = r"query GetProduct($id: ID!) {
  product(id: $id) {
    id
    title
    descriptionHtml
  }
}";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub id: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub product: Option<Product>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Product {
        pub id: String,
        pub title: String,
        #[serde(default)]
        pub description_html: String,
    }
}

/// Fetch one page of the catalog with collections, image and fulfillment data.
pub struct GetProducts;
graphql_operation!(GetProducts, get_products);

pub mod get_products {
    use serde::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "GetProducts";
    pub const QUERY: &str = r"query GetProducts($first: Int!, $after: String) {
  products(first: $first, after: $after) {
    edges {
      cursor
      node {
        id
        title
        descriptionHtml
        collections(first: 5) {
          edges { node { id title } }
        }
        images(first: 1) {
          edges { node { url } }
        }
        variants(first: 1) {
          edges { node { fulfillmentService { handle } } }
        }
      }
    }
    pageInfo {
      hasNextPage
    }
  }
}";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: i64,
        pub after: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: Option<ProductConnection>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductConnection {
        pub edges: Vec<ProductEdge>,
        pub page_info: PageInfo,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PageInfo {
        pub has_next_page: bool,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ProductEdge {
        pub cursor: String,
        pub node: ProductNode,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductNode {
        pub id: String,
        pub title: String,
        #[serde(default)]
        pub description_html: String,
        #[serde(default)]
        pub collections: Connection<CollectionNode>,
        #[serde(default)]
        pub images: Connection<ImageNode>,
        #[serde(default)]
        pub variants: Connection<VariantNode>,
    }

    /// Generic `{ edges { node } }` connection without pagination data.
    #[derive(Debug, Clone, Deserialize)]
    pub struct Connection<T> {
        pub edges: Vec<Edge<T>>,
    }

    impl<T> Default for Connection<T> {
        fn default() -> Self {
            Self { edges: Vec::new() }
        }
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Edge<T> {
        pub node: T,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CollectionNode {
        pub id: String,
        pub title: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ImageNode {
        pub url: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct VariantNode {
        pub fulfillment_service: Option<FulfillmentService>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct FulfillmentService {
        pub handle: String,
    }
}

// =============================================================================
// Product mutations
// =============================================================================

/// Update a product's title, description, SEO fields and template suffix.
pub struct ProductUpdate;
graphql_operation!(ProductUpdate, product_update);

pub mod product_update {
    use serde::{Deserialize, Serialize};

    use super::ProductUpdatePayload;
    use crate::shopify::types::ProductUpdateInput;

    pub const OPERATION_NAME: &str = "ProductUpdate";
    pub const QUERY: &str = r"mutation ProductUpdate($product: ProductUpdateInput!) {
  productUpdate(product: $product) {
    product {
      id
      title
      descriptionHtml
      seo {
        title
        description
      }
    }
    userErrors {
      field
      message
    }
  }
}";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub product: ProductUpdateInput,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_update: Option<ProductUpdatePayload>,
    }
}

/// Upsert metafields on one or more owners.
pub struct MetafieldsSet;
graphql_operation!(MetafieldsSet, metafields_set);

pub mod metafields_set {
    use serde::{Deserialize, Serialize};

    use super::MetafieldsSetPayload;
    use crate::shopify::types::MetafieldsSetInput;

    pub const OPERATION_NAME: &str = "MetafieldsSet";
    pub const QUERY: &str = r"mutation MetafieldsSet($metafields: [MetafieldsSetInput!]!) {
  metafieldsSet(metafields: $metafields) {
    metafields {
      id
      namespace
      key
      value
    }
    userErrors {
      field
      message
    }
  }
}";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub metafields: Vec<MetafieldsSetInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub metafields_set: Option<MetafieldsSetPayload>,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_query_body_carries_operation_name() {
        let body = GetProducts::build_query(get_products::Variables {
            first: 100,
            after: None,
        });
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["operationName"], "GetProducts");
        assert_eq!(json["variables"]["first"], 100);
        assert!(json["variables"]["after"].is_null());
        assert!(json["query"].as_str().unwrap().contains("pageInfo"));
    }

    #[test]
    fn test_products_node_defaults_missing_connections() {
        let node: get_products::ProductNode = serde_json::from_value(serde_json::json!({
            "id": "gid://shopify/Product/1",
            "title": "Widget"
        }))
        .unwrap();
        assert!(node.collections.edges.is_empty());
        assert!(node.images.edges.is_empty());
        assert!(node.description_html.is_empty());
    }
}
