//! JSON API handlers.

use axum::{
    Form, Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use homare_core::{ProductGid, RewriteTemplate};

use crate::catalog::{admin_url, collection_titles, paginate, suggest_breadcrumbs};
use crate::error::{AppError, SaveError};
use crate::rewrite::{
    Breadcrumbs, GeneratedContent, RewriteRequest, Rewriter, metafield_entries, normalize_disclaimer,
    parse_generated,
};
use crate::shopify::{CatalogProduct, MetafieldsSetInput, ProductUpdateInput, SeoInput};
use crate::state::AppState;

use super::load_catalog;
use super::products::ListQuery;

// =============================================================================
// Catalog
// =============================================================================

/// Product entry of the JSON list.
#[derive(Debug, Serialize)]
pub struct ProductSummary {
    pub id: ProductGid,
    pub title: String,
    pub image_url: Option<String>,
    pub collections: Vec<String>,
    pub admin_url: String,
}

impl ProductSummary {
    fn new(product: &CatalogProduct, shop_handle: &str) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            image_url: product.image_url.clone(),
            collections: product.collections.iter().map(|c| c.title.clone()).collect(),
            admin_url: admin_url(shop_handle, &product.id),
        }
    }
}

/// One page of the filtered catalog.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductSummary>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
    pub collections: Vec<String>,
}

/// List products with the picklist filters.
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProductListResponse>, AppError> {
    let catalog = load_catalog(&state).await?;
    let filtered = query.filter().apply(&catalog);
    let page = paginate(&filtered, query.page());
    let shop_handle = state.config().shopify.shop_handle();

    Ok(Json(ProductListResponse {
        products: page
            .items
            .iter()
            .map(|p| ProductSummary::new(p, shop_handle))
            .collect(),
        page: page.page,
        total_pages: page.total_pages,
        total: page.total,
        collections: collection_titles(&catalog),
    }))
}

/// Breadcrumb suggestion query parameters.
#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub q: String,
}

/// Suggest collection titles for breadcrumb inputs.
#[instrument(skip(state))]
pub async fn suggest_collections(
    State(state): State<AppState>,
    Query(query): Query<SuggestQuery>,
) -> Result<Json<Vec<String>>, AppError> {
    let catalog = load_catalog(&state).await?;
    let titles = collection_titles(&catalog);

    Ok(Json(
        suggest_breadcrumbs(&titles, &query.q)
            .into_iter()
            .map(String::from)
            .collect(),
    ))
}

// =============================================================================
// Rewriting
// =============================================================================

/// Bulk rewrite form.
#[derive(Debug, Deserialize)]
pub struct BulkRewriteForm {
    /// JSON array of product IDs.
    #[serde(default)]
    pub ids: String,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub cat_big: Option<String>,
    #[serde(default)]
    pub cat_mid: Option<String>,
}

impl BulkRewriteForm {
    /// Validate the form into a batch request.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for malformed IDs or an unknown template.
    pub fn into_request(self) -> Result<RewriteRequest, AppError> {
        let raw: Vec<String> = if self.ids.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&self.ids)
                .map_err(|e| AppError::BadRequest(format!("ids must be a JSON array: {e}")))?
        };
        let ids = raw
            .iter()
            .map(|id| ProductGid::parse(id))
            .collect::<Result<Vec<_>, _>>()?;

        let template = RewriteTemplate::parse_or_default(self.template.as_deref())?;

        let non_blank = |s: Option<String>| s.filter(|s| !s.trim().is_empty());

        Ok(RewriteRequest {
            ids,
            template,
            breadcrumbs: Breadcrumbs {
                cat_big: non_blank(self.cat_big),
                cat_mid: non_blank(self.cat_mid),
            },
        })
    }
}

/// Rewrite the selected products and report how many were saved.
#[instrument(skip(state, form))]
pub async fn bulk_rewrite(
    State(state): State<AppState>,
    Form(form): Form<BulkRewriteForm>,
) -> Result<Json<Value>, AppError> {
    let request = form.into_request()?;
    let report = Rewriter::new(state.shopify(), state.openai())
        .run_batch(request)
        .await;

    Ok(Json(json!({
        "status": "success",
        "count": report.succeeded,
    })))
}

/// Single-item generation request.
#[derive(Debug, Deserialize)]
pub struct RewriteBody {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Product being edited; metafield entries are only built when set.
    #[serde(default)]
    pub id: Option<String>,
}

/// Single-item generation result.
///
/// `result` is the raw model text. `content` is its parsed, disclaimer-
/// normalized form, absent when the text is not valid content.
#[derive(Debug, Serialize)]
pub struct RewriteResponse {
    pub result: String,
    pub content: Option<GeneratedContent>,
    pub metafields: Vec<MetafieldField>,
}

/// Generate content for one title and description without saving.
#[instrument(skip(state, body))]
pub async fn rewrite(
    State(state): State<AppState>,
    Json(body): Json<RewriteBody>,
) -> Result<Json<RewriteResponse>, AppError> {
    let id = body.id.as_deref().map(ProductGid::parse).transpose()?;

    let result = Rewriter::new(state.shopify(), state.openai())
        .generate(&body.title, &body.description)
        .await?;

    let content = match parse_generated(&result) {
        Ok(content) => Some(content),
        Err(e) => {
            tracing::warn!(error = %e, "Generated text is not valid content");
            None
        }
    };

    let metafields = match (&id, &content) {
        (Some(id), Some(content)) => {
            metafield_entries(id, &content.specs, &Breadcrumbs::default())
                .into_iter()
                .map(MetafieldField::from)
                .collect()
        }
        _ => Vec::new(),
    };

    Ok(Json(RewriteResponse {
        result,
        content,
        metafields,
    }))
}

// =============================================================================
// Single-product save
// =============================================================================

/// Metafield entry of a save request.
#[derive(Debug, Serialize, Deserialize)]
pub struct MetafieldField {
    pub namespace: String,
    pub key: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl From<MetafieldsSetInput> for MetafieldField {
    fn from(input: MetafieldsSetInput) -> Self {
        Self {
            namespace: input.namespace,
            key: input.key,
            kind: input.kind,
            value: input.value,
        }
    }
}

/// Single-product save request.
#[derive(Debug, Deserialize)]
pub struct UpdateProductBody {
    pub id: String,
    pub title: String,
    pub body_html: String,
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub seo_description: Option<String>,
    #[serde(default)]
    pub metafields: Vec<MetafieldField>,
}

/// Save one product's fields and metafields, passing the mutation payloads
/// through unchanged.
#[instrument(skip(state, body), fields(product_id = %body.id))]
pub async fn update_product(
    State(state): State<AppState>,
    Json(body): Json<UpdateProductBody>,
) -> Result<Json<Value>, SaveError> {
    let id = ProductGid::parse(&body.id)?;

    let product_update = state
        .shopify()
        .update_product(ProductUpdateInput {
            id: id.to_string(),
            title: Some(body.title),
            description_html: Some(normalize_disclaimer(&body.body_html)),
            template_suffix: None,
            seo: SeoInput::from_parts(body.seo_title, body.seo_description),
        })
        .await?;

    let metafields: Vec<MetafieldsSetInput> = body
        .metafields
        .into_iter()
        .map(|m| MetafieldsSetInput {
            owner_id: id.to_string(),
            namespace: m.namespace,
            key: m.key,
            kind: m.kind,
            value: m.value,
        })
        .collect();

    let metafields_set = if metafields.is_empty() {
        None
    } else {
        Some(state.shopify().set_metafields(metafields).await?)
    };

    Ok(Json(json!({
        "data": {
            "productUpdate": product_update,
            "metafieldsSet": metafields_set,
        }
    })))
}
