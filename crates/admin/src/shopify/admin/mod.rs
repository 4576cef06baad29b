//! Shopify Admin API GraphQL client with access-token authentication.
//!
//! This module provides a type-safe client for the handful of Admin API
//! operations the rewriter needs: reading products and writing product
//! fields and metafields back.

use std::sync::Arc;

use graphql_client::GraphQLQuery;
use reqwest::header::HeaderValue;
use secrecy::ExposeSecret;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::instrument;

use crate::config::ShopifyAdminConfig;

use super::{AdminShopifyError, GraphQLError, GraphQLErrorLocation};

mod conversions;
mod products;
pub mod queries;

/// Shopify Admin API GraphQL client.
///
/// Cheap to clone; all clones share one connection pool. Constructed once at
/// start-up and shared read-only by every handler.
///
/// # Security
///
/// This client holds an access token with HIGH PRIVILEGE access to the store.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: HeaderValue,
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
    #[serde(default)]
    locations: Vec<GraphQLErrorLocationResponse>,
    #[serde(default)]
    path: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorLocationResponse {
    line: i64,
    column: i64,
}

impl AdminClient {
    /// Create a new Admin API client.
    ///
    /// # Arguments
    ///
    /// * `config` - Shopify Admin API configuration
    ///
    /// # Errors
    ///
    /// Returns `AdminShopifyError::InvalidToken` if the access token contains
    /// characters that are not valid in an HTTP header.
    pub fn new(config: &ShopifyAdminConfig) -> Result<Self, AdminShopifyError> {
        let mut access_token = HeaderValue::from_str(config.access_token.expose_secret())
            .map_err(|e| AdminShopifyError::InvalidToken(e.to_string()))?;
        access_token.set_sensitive(true);

        Ok(Self {
            inner: Arc::new(AdminClientInner {
                client: reqwest::Client::new(),
                endpoint: config.graphql_endpoint(),
                access_token,
            }),
        })
    }

    /// Get the GraphQL endpoint this client talks to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    // =========================================================================
    // GraphQL Execution
    // =========================================================================

    /// Execute a GraphQL operation.
    #[instrument(skip(self, variables), fields(operation))]
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, AdminShopifyError>
    where
        Q::ResponseData: DeserializeOwned,
    {
        let body = Q::build_query(variables);
        tracing::Span::current().record("operation", body.operation_name);

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header("X-Shopify-Access-Token", self.inner.access_token.clone())
            .json(&body)
            .send()
            .await?;

        // Check for rate limiting
        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(AdminShopifyError::RateLimited(retry_after));
        }

        // Check for unauthorized
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AdminShopifyError::Unauthorized(
                "Invalid or expired access token".to_string(),
            ));
        }

        let response = response.error_for_status()?;
        let graphql_response: GraphQLResponse<Q::ResponseData> = response.json().await?;

        // Check for GraphQL errors
        if let Some(errors) = graphql_response.errors
            && !errors.is_empty()
        {
            let converted_errors: Vec<GraphQLError> = errors
                .into_iter()
                .map(|e| GraphQLError {
                    message: e.message,
                    locations: e
                        .locations
                        .into_iter()
                        .map(|l| GraphQLErrorLocation {
                            line: l.line,
                            column: l.column,
                        })
                        .collect(),
                    path: e.path,
                })
                .collect();
            return Err(AdminShopifyError::GraphQL(converted_errors));
        }

        graphql_response.data.ok_or_else(|| {
            AdminShopifyError::GraphQL(vec![GraphQLError {
                message: "No data in response".to_string(),
                locations: vec![],
                path: vec![],
            }])
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_client_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AdminClient>();
    }

    #[test]
    fn test_admin_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AdminClient>();
    }

    #[test]
    fn test_endpoint_from_config() {
        let config = ShopifyAdminConfig {
            store: "homare-test.myshopify.com".to_string(),
            api_version: "2025-01".to_string(),
            access_token: secrecy::SecretString::from("shpat_test"),
        };
        let client = AdminClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://homare-test.myshopify.com/admin/api/2025-01/graphql.json"
        );
    }

    mod http {
        use wiremock::matchers::{header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        use super::*;
        use homare_core::ProductGid;

        async fn client(server: &MockServer) -> AdminClient {
            AdminClient::new(&ShopifyAdminConfig {
                store: server.uri(),
                api_version: "2025-01".to_string(),
                access_token: secrecy::SecretString::from("shpat_test"),
            })
            .unwrap()
        }

        fn id() -> ProductGid {
            ProductGid::parse("gid://shopify/Product/1").unwrap()
        }

        #[tokio::test]
        async fn test_sends_access_token_header() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/admin/api/2025-01/graphql.json"))
                .and(header("X-Shopify-Access-Token", "shpat_test"))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "data": {"product": {"id": "gid://shopify/Product/1", "title": "Widget", "descriptionHtml": "<p>w</p>"}}
                })))
                .expect(1)
                .mount(&server)
                .await;

            let product = client(&server).await.get_product(&id()).await.unwrap().unwrap();
            assert_eq!(product.title, "Widget");
            assert_eq!(product.description_html, "<p>w</p>");
        }

        #[tokio::test]
        async fn test_missing_product_is_none() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(serde_json::json!({"data": {"product": null}})),
                )
                .mount(&server)
                .await;

            assert!(client(&server).await.get_product(&id()).await.unwrap().is_none());
        }

        #[tokio::test]
        async fn test_graphql_errors() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "errors": [{"message": "Throttled", "locations": [{"line": 1, "column": 2}]}]
                })))
                .mount(&server)
                .await;

            let err = client(&server).await.get_product(&id()).await.unwrap_err();
            assert_eq!(err.to_string(), "GraphQL errors: Throttled");
        }

        #[tokio::test]
        async fn test_rate_limit_and_unauthorized() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "2"))
                .up_to_n_times(1)
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(401))
                .mount(&server)
                .await;

            let client = client(&server).await;
            assert!(matches!(
                client.get_product(&id()).await,
                Err(AdminShopifyError::RateLimited(2))
            ));
            assert!(matches!(
                client.get_product(&id()).await,
                Err(AdminShopifyError::Unauthorized(_))
            ));
        }
    }

    #[test]
    fn test_rejects_token_with_newline() {
        let config = ShopifyAdminConfig {
            store: "homare-test.myshopify.com".to_string(),
            api_version: "2025-01".to_string(),
            access_token: secrecy::SecretString::from("shpat\nbad"),
        };
        assert!(matches!(
            AdminClient::new(&config),
            Err(AdminShopifyError::InvalidToken(_))
        ));
    }
}
