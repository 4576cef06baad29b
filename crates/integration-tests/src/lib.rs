//! Integration tests for the Homare rewrite back-office.
//!
//! Both upstream APIs are replaced by `wiremock` servers: the Shopify store is
//! configured with the mock's `http://` origin and the chat API base URL
//! points at the second mock. No credentials or network access are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p homare-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog` - Full-catalog pagination and filtering
//! - `bulk_rewrite` - Batch rewrite and catalog writes
//! - `api` - HTTP endpoints driven through the router

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::{IpAddr, Ipv4Addr};

use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use homare_admin::config::{AdminConfig, CatalogConfig, OpenAIConfig, ShopifyAdminConfig};
use homare_admin::state::AppState;

/// API version used by every test config.
pub const API_VERSION: &str = "2025-01";

/// Path of the mocked Admin GraphQL endpoint.
pub const GRAPHQL_PATH: &str = "/admin/api/2025-01/graphql.json";

/// Path of the mocked chat completions endpoint.
pub const CHAT_PATH: &str = "/v1/chat/completions";

/// Mock upstreams plus the state wired to them.
pub struct TestContext {
    pub shopify: MockServer,
    pub openai: MockServer,
    pub state: AppState,
}

impl TestContext {
    /// Start both mocks with no catalog filter.
    pub async fn start() -> Self {
        Self::with_catalog(CatalogConfig::default()).await
    }

    /// Start both mocks with the given catalog filter.
    pub async fn with_catalog(catalog: CatalogConfig) -> Self {
        let shopify = MockServer::start().await;
        let openai = MockServer::start().await;
        let state = AppState::new(config(&shopify, &openai, catalog)).unwrap();
        Self {
            shopify,
            openai,
            state,
        }
    }

    /// Mount a response for one GraphQL operation, optionally matching part
    /// of its variables.
    pub async fn mock_graphql(&self, operation: &str, variables: Option<Value>, data: Value) {
        let mut body = json!({ "operationName": operation });
        if let Some(variables) = variables {
            body["variables"] = variables;
        }
        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(body_partial_json(body))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
            .mount(&self.shopify)
            .await;
    }

    /// Mount a chat completion answering every prompt with `content`.
    pub async fn mock_chat(&self, content: &str) {
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_response(content)))
            .mount(&self.openai)
            .await;
    }

    /// Bodies of every GraphQL request received, in order.
    pub async fn graphql_requests(&self) -> Vec<Value> {
        self.shopify
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == GRAPHQL_PATH)
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }

    /// Bodies of the requests for one operation, in order.
    pub async fn operation_requests(&self, operation: &str) -> Vec<Value> {
        self.graphql_requests()
            .await
            .into_iter()
            .filter(|body| body["operationName"] == operation)
            .collect()
    }
}

/// Admin config pointing at the two mock servers.
#[must_use]
pub fn config(shopify: &MockServer, openai: &MockServer, catalog: CatalogConfig) -> AdminConfig {
    AdminConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        shopify: ShopifyAdminConfig {
            store: shopify.uri(),
            api_version: API_VERSION.to_string(),
            access_token: SecretString::from("shpat_test"),
        },
        openai: OpenAIConfig {
            api_key: SecretString::from("sk-test"),
            model: "gpt-4o".to_string(),
            base_url: format!("{}/v1", openai.uri()),
        },
        catalog,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Product GID for a numeric ID.
#[must_use]
pub fn gid(id: u64) -> String {
    format!("gid://shopify/Product/{id}")
}

/// A `GetProducts` node.
#[must_use]
pub fn product_node(id: u64, title: &str, collections: &[&str], fulfillment: Option<&str>) -> Value {
    let collection_edges: Vec<Value> = collections
        .iter()
        .enumerate()
        .map(|(i, title)| {
            json!({ "node": { "id": format!("gid://shopify/Collection/{}", i + 1), "title": title } })
        })
        .collect();
    json!({
        "id": gid(id),
        "title": title,
        "descriptionHtml": format!("<p>{title}</p>"),
        "collections": { "edges": collection_edges },
        "images": { "edges": [] },
        "variants": { "edges": [
            { "node": { "fulfillmentService": fulfillment.map(|h| json!({ "handle": h })) } }
        ] },
    })
}

/// `GetProducts` data for one page. Edge cursors are `c<id>`.
#[must_use]
pub fn products_page(nodes: Vec<Value>, has_next_page: bool) -> Value {
    let edges: Vec<Value> = nodes
        .into_iter()
        .map(|node| {
            let id = node["id"].as_str().unwrap_or_default();
            let cursor = format!("c{}", id.rsplit('/').next().unwrap_or_default());
            json!({ "cursor": cursor, "node": node })
        })
        .collect();
    json!({
        "products": {
            "edges": edges,
            "pageInfo": { "hasNextPage": has_next_page },
        }
    })
}

/// `GetProduct` data.
#[must_use]
pub fn product(id: u64, title: &str, description_html: &str) -> Value {
    json!({ "product": { "id": gid(id), "title": title, "descriptionHtml": description_html } })
}

/// Successful `ProductUpdate` data.
#[must_use]
pub fn product_update_ok(id: u64, title: &str) -> Value {
    json!({
        "productUpdate": {
            "product": { "id": gid(id), "title": title, "descriptionHtml": "", "seo": null },
            "userErrors": [],
        }
    })
}

/// `ProductUpdate` data rejected with one user error.
#[must_use]
pub fn product_update_rejected(message: &str) -> Value {
    json!({
        "productUpdate": {
            "product": null,
            "userErrors": [{ "field": ["title"], "message": message }],
        }
    })
}

/// Successful `MetafieldsSet` data.
#[must_use]
pub fn metafields_set_ok() -> Value {
    json!({ "metafieldsSet": { "metafields": [], "userErrors": [] } })
}

/// `MetafieldsSet` data rejected with one user error.
#[must_use]
pub fn metafields_set_rejected(message: &str) -> Value {
    json!({
        "metafieldsSet": {
            "metafields": null,
            "userErrors": [{ "field": ["metafields", "0", "value"], "message": message }],
        }
    })
}

/// Chat completions response with one choice.
#[must_use]
pub fn chat_response(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop",
        }],
    })
}

/// Model output for a product, wrapped in prose like real completions.
#[must_use]
pub fn generated(title: &str, details4: &str) -> String {
    let content = json!({
        "title": title,
        "bodyHtml": "<p>説明</p>",
        "seoTitle": format!("{title}｜誉PRINTING"),
        "seoDescription": "説明文",
        "specs": {
            "details1": "10cm",
            "details2": "木材",
            "details3": "収納",
            "details4": details4,
        },
    });
    format!("Here is the result:\n```json\n{content}\n```")
}
