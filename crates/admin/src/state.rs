//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AdminConfig;
use crate::openai::{ChatClient, OpenAiError};
use crate::shopify::{AdminClient, AdminShopifyError};

/// Error building the API clients from configuration.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("shopify client: {0}")]
    Shopify(#[from] AdminShopifyError),
    #[error("openai client: {0}")]
    OpenAi(#[from] OpenAiError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The clients are built once at
/// start-up and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    shopify: AdminClient,
    openai: ChatClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if a credential cannot be used as an HTTP header.
    pub fn new(config: AdminConfig) -> Result<Self, StateError> {
        let shopify = AdminClient::new(&config.shopify)?;
        let openai = ChatClient::new(&config.openai)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                shopify,
                openai,
            }),
        })
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the Shopify Admin API client.
    #[must_use]
    pub fn shopify(&self) -> &AdminClient {
        &self.inner.shopify
    }

    /// Get a reference to the `OpenAI` chat client.
    #[must_use]
    pub fn openai(&self) -> &ChatClient {
        &self.inner.openai
    }
}
