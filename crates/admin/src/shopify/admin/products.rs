//! Product reads and writes for the Admin API.

use tracing::instrument;

use homare_core::ProductGid;

use super::{
    AdminClient, AdminShopifyError,
    conversions::{convert_catalog_page, convert_product_context},
    queries::{GetProduct, GetProducts, MetafieldsSet, ProductUpdate},
};
use crate::shopify::types::{
    CatalogPage, MetafieldsSetInput, MetafieldsSetPayload, ProductContext, ProductUpdateInput,
    ProductUpdatePayload,
};

impl AdminClient {
    /// Get the fields a rewrite prompt is built from.
    ///
    /// Returns `Ok(None)` when the product does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(
        &self,
        id: &ProductGid,
    ) -> Result<Option<ProductContext>, AdminShopifyError> {
        let variables = super::queries::get_product::Variables {
            id: id.to_string(),
        };

        let response = self.execute::<GetProduct>(variables).await?;

        Ok(response.product.and_then(convert_product_context))
    }

    /// Get one page of the catalog.
    ///
    /// # Arguments
    ///
    /// * `first` - Number of products to return
    /// * `after` - Cursor of the last product on the previous page
    ///
    /// # Errors
    ///
    /// Returns `AdminShopifyError::MissingField` if the response has no
    /// `products` connection, or an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_products_page(
        &self,
        first: i64,
        after: Option<String>,
    ) -> Result<CatalogPage, AdminShopifyError> {
        let variables = super::queries::get_products::Variables { first, after };

        let response = self.execute::<GetProducts>(variables).await?;

        let connection = response
            .products
            .ok_or(AdminShopifyError::MissingField("products"))?;

        Ok(convert_catalog_page(connection))
    }

    /// Update a product's title, description, SEO fields or template suffix.
    ///
    /// `userErrors` are returned inside the payload, not as an `Err`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the payload is missing.
    #[instrument(skip(self, input), fields(product_id = %input.id))]
    pub async fn update_product(
        &self,
        input: ProductUpdateInput,
    ) -> Result<ProductUpdatePayload, AdminShopifyError> {
        let variables = super::queries::product_update::Variables { product: input };

        let response = self.execute::<ProductUpdate>(variables).await?;

        response
            .product_update
            .ok_or(AdminShopifyError::MissingField("productUpdate"))
    }

    /// Upsert metafields.
    ///
    /// `userErrors` are returned inside the payload, not as an `Err`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the payload is missing.
    #[instrument(skip(self, metafields), fields(count = metafields.len()))]
    pub async fn set_metafields(
        &self,
        metafields: Vec<MetafieldsSetInput>,
    ) -> Result<MetafieldsSetPayload, AdminShopifyError> {
        let variables = super::queries::metafields_set::Variables { metafields };

        let response = self.execute::<MetafieldsSet>(variables).await?;

        response
            .metafields_set
            .ok_or(AdminShopifyError::MissingField("metafieldsSet"))
    }
}
