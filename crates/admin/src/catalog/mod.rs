//! Catalog snapshot reading and the product picklist.

mod picklist;
mod reader;

pub use picklist::{
    MAX_SUGGESTIONS, PAGE_SIZE, PageSlice, ProductFilter, SelectionSet, admin_url, paginate,
    suggest_breadcrumbs, total_pages,
};
pub use reader::{CATALOG_PAGE_SIZE, collection_titles, read_catalog};
