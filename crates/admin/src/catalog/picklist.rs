//! Filtering, paging and selection over a catalog snapshot.

use std::collections::BTreeSet;

use homare_core::{GidError, ProductGid};

use crate::shopify::CatalogProduct;

/// Products shown per picklist page.
pub const PAGE_SIZE: usize = 50;

/// Maximum number of breadcrumb suggestions returned.
pub const MAX_SUGGESTIONS: usize = 20;

/// Picklist filter. All set conditions must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive title substring. Blank means no keyword filter.
    pub keyword: Option<String>,
    /// Only titles containing an ASCII Latin letter.
    pub latin_only: bool,
    /// Exact collection title the product must belong to.
    pub collection: Option<String>,
}

impl ProductFilter {
    /// Whether a product passes the filter.
    #[must_use]
    pub fn matches(&self, product: &CatalogProduct) -> bool {
        let keyword_ok = self
            .keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .is_none_or(|k| product.title.to_lowercase().contains(&k.to_lowercase()));

        let latin_ok = !self.latin_only || product.title.chars().any(|c| c.is_ascii_alphabetic());

        let collection_ok = self
            .collection
            .as_deref()
            .filter(|c| !c.is_empty())
            .is_none_or(|c| product.in_collection(c));

        keyword_ok && latin_ok && collection_ok
    }

    /// Products passing the filter, in snapshot order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [CatalogProduct]) -> Vec<&'a CatalogProduct> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Number of pages for `count` items; at least one.
#[must_use]
pub const fn total_pages(count: usize) -> usize {
    if count == 0 { 1 } else { count.div_ceil(PAGE_SIZE) }
}

/// One page of a filtered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSlice<'a, T> {
    /// Items on this page.
    pub items: &'a [T],
    /// 1-based page number after clamping.
    pub page: usize,
    /// Total number of pages.
    pub total_pages: usize,
    /// Total number of items across all pages.
    pub total: usize,
}

/// Slice out a page, clamping `page` into `[1, total_pages]`.
#[must_use]
pub fn paginate<T>(items: &[T], page: usize) -> PageSlice<'_, T> {
    let total_pages = total_pages(items.len());
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(items.len());

    PageSlice {
        items: items.get(start..end).unwrap_or_default(),
        page,
        total_pages,
        total: items.len(),
    }
}

/// Products chosen for a bulk rewrite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<ProductGid>,
}

impl SelectionSet {
    /// An empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list of product IDs. Blank entries are ignored.
    ///
    /// # Errors
    ///
    /// Returns a `GidError` for the first entry that is not a product ID.
    pub fn from_query(s: &str) -> Result<Self, GidError> {
        let ids = s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ProductGid::parse)
            .collect::<Result<_, _>>()?;
        Ok(Self { ids })
    }

    /// Comma-separated form for URLs.
    #[must_use]
    pub fn to_query(&self) -> String {
        self.ids
            .iter()
            .map(ProductGid::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Whether `id` is selected.
    #[must_use]
    pub fn contains(&self, id: &ProductGid) -> bool {
        self.ids.contains(id)
    }

    /// Number of selected products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected IDs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &ProductGid> {
        self.ids.iter()
    }

    /// Add `id` if absent, remove it if present.
    pub fn toggle(&mut self, id: ProductGid) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Whether every id of `page` is selected. False for an empty page.
    #[must_use]
    pub fn all_selected(&self, page: &[ProductGid]) -> bool {
        !page.is_empty() && page.iter().all(|id| self.ids.contains(id))
    }

    /// Deselect the page if it is fully selected, otherwise select all of it.
    pub fn toggle_page(&mut self, page: &[ProductGid]) {
        if self.all_selected(page) {
            for id in page {
                self.ids.remove(id);
            }
        } else {
            self.ids.extend(page.iter().cloned());
        }
    }
}

impl FromIterator<ProductGid> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = ProductGid>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Collection titles containing `input`, case-insensitively, at most
/// [`MAX_SUGGESTIONS`].
#[must_use]
pub fn suggest_breadcrumbs<'a>(titles: &'a [String], input: &str) -> Vec<&'a str> {
    let needle = input.trim().to_lowercase();
    titles
        .iter()
        .filter(|t| t.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .map(String::as_str)
        .collect()
}

/// Shopify admin link for a product.
#[must_use]
pub fn admin_url(shop_handle: &str, id: &ProductGid) -> String {
    format!(
        "https://admin.shopify.com/store/{shop_handle}/products/{}",
        id.numeric()
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use homare_core::CollectionGid;

    use super::*;
    use crate::shopify::Collection;

    fn gid(n: usize) -> ProductGid {
        ProductGid::parse(&n.to_string()).unwrap()
    }

    fn product(n: usize, title: &str, collection: Option<&str>) -> CatalogProduct {
        CatalogProduct {
            id: gid(n),
            title: title.to_string(),
            description_html: String::new(),
            collections: collection
                .map(|t| Collection {
                    id: CollectionGid::parse("9").unwrap(),
                    title: t.to_string(),
                })
                .into_iter()
                .collect(),
            image_url: None,
            fulfillment_service: None,
        }
    }

    #[test]
    fn test_keyword_is_case_insensitive() {
        let filter = ProductFilter {
            keyword: Some("  WIDGET ".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&product(1, "Blue widget", None)));
        assert!(!filter.matches(&product(2, "Gadget", None)));
    }

    #[test]
    fn test_latin_only() {
        let filter = ProductFilter {
            latin_only: true,
            ..Default::default()
        };
        assert!(filter.matches(&product(1, "収納ボックス Box", None)));
        assert!(!filter.matches(&product(2, "収納ボックス", None)));
    }

    #[test]
    fn test_filters_combine() {
        let filter = ProductFilter {
            keyword: Some("box".to_string()),
            latin_only: true,
            collection: Some("Kitchen".to_string()),
        };
        let products = [
            product(1, "Box", Some("Kitchen")),
            product(2, "Box", Some("Garden")),
            product(3, "Lamp", Some("Kitchen")),
        ];
        let kept: Vec<_> = filter.apply(&products).iter().map(|p| p.id.clone()).collect();
        assert_eq!(kept, [gid(1)]);
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = ProductFilter {
            keyword: Some(String::new()),
            latin_only: false,
            collection: Some(String::new()),
        };
        assert!(filter.matches(&product(1, "何でも", None)));
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0), 1);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(50), 1);
        assert_eq!(total_pages(51), 2);
        assert_eq!(total_pages(120), 3);
    }

    #[test]
    fn test_paginate_clamps_page() {
        let items: Vec<usize> = (0..120).collect();

        let page = paginate(&items, 3);
        assert_eq!(page.items, &items[100..120]);
        assert_eq!(page.total_pages, 3);

        let page = paginate(&items, 9);
        assert_eq!(page.page, 3);

        let page = paginate(&items, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 50);
    }

    #[test]
    fn test_paginate_empty() {
        let items: Vec<usize> = Vec::new();
        let page = paginate(&items, 4);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_toggle() {
        let mut selection = SelectionSet::new();
        selection.toggle(gid(1));
        assert!(selection.contains(&gid(1)));
        selection.toggle(gid(1));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_page_selects_then_clears() {
        let page = [gid(1), gid(2), gid(3)];
        let mut selection: SelectionSet = [gid(2), gid(7)].into_iter().collect();

        selection.toggle_page(&page);
        assert_eq!(selection.len(), 4);
        assert!(selection.all_selected(&page));

        selection.toggle_page(&page);
        assert_eq!(selection.iter().cloned().collect::<Vec<_>>(), [gid(7)]);
    }

    #[test]
    fn test_all_selected_empty_page() {
        let selection: SelectionSet = [gid(1)].into_iter().collect();
        assert!(!selection.all_selected(&[]));
    }

    #[test]
    fn test_selection_query_round_trip() {
        let selection = SelectionSet::from_query("1, gid://shopify/Product/2,,").unwrap();
        assert_eq!(selection.len(), 2);
        assert_eq!(
            selection.to_query(),
            "gid://shopify/Product/1,gid://shopify/Product/2"
        );
        assert!(SelectionSet::from_query("gid://shopify/Order/1").is_err());
        assert!(SelectionSet::from_query("").unwrap().is_empty());
    }

    #[test]
    fn test_suggest_breadcrumbs() {
        let titles: Vec<String> = ["Kitchen", "Kitchenware", "Garden"]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(suggest_breadcrumbs(&titles, "kitch"), ["Kitchen", "Kitchenware"]);

        let many: Vec<String> = (0..30).map(|i| format!("Item {i}")).collect();
        assert_eq!(suggest_breadcrumbs(&many, "item").len(), MAX_SUGGESTIONS);
        assert_eq!(suggest_breadcrumbs(&many, "").len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn test_admin_url() {
        assert_eq!(
            admin_url("homare-shop", &gid(123)),
            "https://admin.shopify.com/store/homare-shop/products/123"
        );
    }
}
