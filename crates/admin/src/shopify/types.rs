//! Domain types for the Shopify Admin API surface used by the rewriter.
//!
//! These types provide a clean API that doesn't expose the GraphQL response
//! shapes. Mutation payloads are the exception: they are serialized back to
//! callers of the single-product update endpoint unchanged.

use serde::{Deserialize, Serialize};

use homare_core::{CollectionGid, ProductGid};

// =============================================================================
// Catalog snapshot
// =============================================================================

/// A collection a product belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Collection global ID.
    pub id: CollectionGid,
    /// Collection title.
    pub title: String,
}

/// A product as listed in the picklist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogProduct {
    /// Product global ID.
    pub id: ProductGid,
    /// Product title.
    pub title: String,
    /// Product description (HTML).
    pub description_html: String,
    /// Up to five collection memberships, in server order.
    pub collections: Vec<Collection>,
    /// Primary image URL.
    pub image_url: Option<String>,
    /// Fulfillment service handle of the first variant.
    pub fulfillment_service: Option<String>,
}

impl CatalogProduct {
    /// Whether the product belongs to a collection with exactly this title.
    #[must_use]
    pub fn in_collection(&self, title: &str) -> bool {
        self.collections.iter().any(|c| c.title == title)
    }
}

/// One page of the catalog.
#[derive(Debug, Clone)]
pub struct CatalogPage {
    /// Products in server order.
    pub products: Vec<CatalogProduct>,
    /// Whether another page follows.
    pub has_next_page: bool,
    /// Cursor of the last edge on this page.
    pub end_cursor: Option<String>,
}

/// The fields a rewrite prompt is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductContext {
    /// Product global ID.
    pub id: ProductGid,
    /// Current title.
    pub title: String,
    /// Current description (HTML).
    pub description_html: String,
}

// =============================================================================
// Mutation inputs
// =============================================================================

/// SEO fields of a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoInput {
    /// SEO title. Left unchanged when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// SEO meta description. Left unchanged when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SeoInput {
    /// SEO input for the given fields, or `None` when neither is set.
    #[must_use]
    pub fn from_parts(title: Option<String>, description: Option<String>) -> Option<Self> {
        (title.is_some() || description.is_some()).then_some(Self { title, description })
    }
}

/// Input for `productUpdate(product:)`.
///
/// Only provided fields are updated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdateInput {
    /// Product to update.
    pub id: String,
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description (HTML).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_html: Option<String>,
    /// Storefront template suffix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_suffix: Option<String>,
    /// New SEO fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo: Option<SeoInput>,
}

/// Metafield value types written by the rewriter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetafieldType {
    /// `single_line_text_field`
    SingleLineTextField,
    /// `multi_line_text_field`
    MultiLineTextField,
}

impl MetafieldType {
    /// Returns the Shopify type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SingleLineTextField => "single_line_text_field",
            Self::MultiLineTextField => "multi_line_text_field",
        }
    }
}

/// Input entry for `metafieldsSet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetafieldsSetInput {
    /// Resource owning the metafield.
    pub owner_id: String,
    /// Metafield namespace.
    pub namespace: String,
    /// Metafield key.
    pub key: String,
    /// Shopify type name (e.g. `multi_line_text_field`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Metafield value.
    pub value: String,
}

// =============================================================================
// Mutation payloads
// =============================================================================

/// A field-level validation error returned by a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
    /// Path to the offending input field.
    #[serde(default)]
    pub field: Option<Vec<String>>,
    /// Human-readable message.
    pub message: String,
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) if !field.is_empty() => write!(f, "{}: {}", field.join("."), self.message),
            _ => f.write_str(&self.message),
        }
    }
}

/// Join user errors into one message.
#[must_use]
pub fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Product SEO fields as returned by a mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seo {
    /// SEO title.
    pub title: Option<String>,
    /// SEO meta description.
    pub description: Option<String>,
}

/// Product as returned by `productUpdate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedProduct {
    /// Product global ID.
    pub id: String,
    /// Title after the update.
    pub title: Option<String>,
    /// Description after the update.
    pub description_html: Option<String>,
    /// SEO fields after the update.
    pub seo: Option<Seo>,
}

/// Payload of `productUpdate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdatePayload {
    /// Updated product, absent when the update was rejected.
    pub product: Option<UpdatedProduct>,
    /// Validation errors.
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

/// Metafield as returned by `metafieldsSet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metafield {
    /// Metafield global ID.
    pub id: Option<String>,
    /// Metafield namespace.
    pub namespace: Option<String>,
    /// Metafield key.
    pub key: String,
    /// Stored value.
    pub value: Option<String>,
}

/// Payload of `metafieldsSet`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetafieldsSetPayload {
    /// Metafields written.
    #[serde(default)]
    pub metafields: Option<Vec<Metafield>>,
    /// Validation errors.
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}
