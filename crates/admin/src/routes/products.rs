//! Picklist page handlers.
//!
//! All picklist state (filters, page, selection) lives in the query string,
//! so every view is a plain link and survives a reload.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::{Deserialize, Deserializer};
use tracing::instrument;

use homare_core::{ProductGid, RewriteTemplate};

use crate::catalog::{ProductFilter, SelectionSet, admin_url, collection_titles, paginate};
use crate::error::AppError;
use crate::shopify::CatalogProduct;
use crate::state::AppState;

use super::load_catalog;

/// Deserialize empty strings as None for optional numeric fields.
fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Picklist query parameters, shared by the HTML page and the JSON list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// Title keyword.
    #[serde(default)]
    pub keyword: String,
    /// Checkbox value; any of `on`, `true`, `1` enables the filter.
    #[serde(default)]
    pub latin_only: Option<String>,
    /// Exact collection title.
    #[serde(default)]
    pub collection: String,
    /// 1-based page number.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<usize>,
    /// Comma-separated selected product IDs.
    #[serde(default)]
    pub selected: String,
}

impl ListQuery {
    /// Whether the Latin-letter filter is on.
    #[must_use]
    pub fn latin_only(&self) -> bool {
        matches!(
            self.latin_only.as_deref().map(str::trim),
            Some("on" | "true" | "1")
        )
    }

    /// The product filter these parameters describe.
    #[must_use]
    pub fn filter(&self) -> ProductFilter {
        ProductFilter {
            keyword: Some(self.keyword.clone()).filter(|k| !k.trim().is_empty()),
            latin_only: self.latin_only(),
            collection: Some(self.collection.clone()).filter(|c| !c.is_empty()),
        }
    }

    /// Requested page, defaulting to the first.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1)
    }

    /// Query string for `/products` with these filters and the given page
    /// and selection.
    #[must_use]
    pub fn to_query_string(&self, page: usize, selection: &SelectionSet) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        if !self.keyword.is_empty() {
            serializer.append_pair("keyword", &self.keyword);
        }
        if self.latin_only() {
            serializer.append_pair("latin_only", "on");
        }
        if !self.collection.is_empty() {
            serializer.append_pair("collection", &self.collection);
        }
        serializer.append_pair("page", &page.to_string());
        if !selection.is_empty() {
            serializer.append_pair("selected", &selection.to_query());
        }
        serializer.finish()
    }
}

/// Product row for templates.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: String,
    pub numeric_id: String,
    pub title: String,
    pub image_url: Option<String>,
    pub admin_url: String,
    pub selected: bool,
}

impl ProductRow {
    fn new(product: &CatalogProduct, shop_handle: &str, selection: &SelectionSet) -> Self {
        Self {
            id: product.id.to_string(),
            numeric_id: product.id.numeric().to_string(),
            title: product.title.clone(),
            image_url: product.image_url.clone(),
            admin_url: admin_url(shop_handle, &product.id),
            selected: selection.contains(&product.id),
        }
    }
}

/// Products picklist page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductRow>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
    pub keyword: String,
    pub latin_only: bool,
    pub collection: String,
    pub collections: Vec<String>,
    pub templates: Vec<&'static str>,
    pub selected: String,
    pub selected_ids_json: String,
    pub selected_count: usize,
    pub page_ids: String,
    pub page_all_selected: bool,
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
    pub error: Option<String>,
}

/// Products picklist page handler.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let selection = SelectionSet::from_query(&query.selected)?;

    let (catalog, error) = match load_catalog(&state).await {
        Ok(catalog) => (catalog, None),
        Err(e) => {
            tracing::error!("Failed to fetch products: {e}");
            (Vec::new(), Some(format!("商品一覧を取得できませんでした: {e}")))
        }
    };

    let filtered = query.filter().apply(&catalog);
    let page = paginate(&filtered, query.page());
    let shop_handle = state.config().shopify.shop_handle();

    let page_gids: Vec<ProductGid> = page.items.iter().map(|p| p.id.clone()).collect();
    let selected_ids: Vec<&str> = selection.iter().map(ProductGid::as_str).collect();

    let link = |n: usize| format!("/products?{}", query.to_query_string(n, &selection));

    Ok(ProductsIndexTemplate {
        products: page
            .items
            .iter()
            .map(|p| ProductRow::new(p, shop_handle, &selection))
            .collect(),
        page: page.page,
        total_pages: page.total_pages,
        total: page.total,
        keyword: query.keyword.clone(),
        latin_only: query.latin_only(),
        collection: query.collection.clone(),
        collections: collection_titles(&catalog),
        templates: RewriteTemplate::ALL.iter().map(|t| t.as_str()).collect(),
        selected: selection.to_query(),
        selected_ids_json: serde_json::to_string(&selected_ids).unwrap_or_else(|_| "[]".into()),
        selected_count: selection.len(),
        page_ids: page_gids
            .iter()
            .map(ProductGid::as_str)
            .collect::<Vec<_>>()
            .join(","),
        page_all_selected: selection.all_selected(&page_gids),
        prev_url: (page.page > 1).then(|| link(page.page - 1)),
        next_url: (page.page < page.total_pages).then(|| link(page.page + 1)),
        error,
    })
}

/// Single-product editor template.
#[derive(Template, WebTemplate)]
#[template(path = "products/edit.html")]
pub struct ProductEditTemplate {
    pub id: String,
    pub numeric_id: String,
    pub title: String,
    pub description_html: String,
    pub admin_url: String,
}

/// Single-product editor: generate with `/api/rewrite`, review, then save
/// through `/api/update-product`.
#[instrument(skip(state))]
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = ProductGid::parse(&id)?;
    let product = state
        .shopify()
        .get_product(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(id.to_string()))?;

    Ok(ProductEditTemplate {
        numeric_id: id.numeric().to_string(),
        admin_url: admin_url(state.config().shopify.shop_handle(), &id),
        id: product.id.to_string(),
        title: product.title,
        description_html: product.description_html,
    })
}

/// Selection change posted from the picklist.
#[derive(Debug, Deserialize)]
pub struct SelectionForm {
    /// Current list state.
    #[serde(flatten)]
    pub list: ListQuery,
    /// Product ID to toggle.
    #[serde(default)]
    pub toggle: Option<String>,
    /// Present when the whole visible page should be toggled.
    #[serde(default)]
    pub toggle_page: Option<String>,
    /// Comma-separated IDs of the visible page.
    #[serde(default)]
    pub page_ids: String,
    /// Present when the selection should be cleared.
    #[serde(default)]
    pub clear: Option<String>,
}

/// Apply a selection change and redirect back to the list.
#[instrument(skip(form))]
pub async fn update_selection(Form(form): Form<SelectionForm>) -> Result<Redirect, AppError> {
    let mut selection = SelectionSet::from_query(&form.list.selected)?;

    if form.clear.is_some() {
        selection = SelectionSet::new();
    } else if form.toggle_page.is_some() {
        let page: Vec<ProductGid> = SelectionSet::from_query(&form.page_ids)?
            .iter()
            .cloned()
            .collect();
        selection.toggle_page(&page);
    } else if let Some(id) = form.toggle.as_deref() {
        selection.toggle(ProductGid::parse(id)?);
    }

    Ok(Redirect::to(&format!(
        "/products?{}",
        form.list.to_query_string(form.list.page(), &selection)
    )))
}
