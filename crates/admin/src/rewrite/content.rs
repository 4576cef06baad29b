//! Generated content and the catalog writes derived from it.

use serde::{Deserialize, Serialize};

use homare_core::{ProductGid, RewriteTemplate};

use crate::shopify::{MetafieldType, MetafieldsSetInput, ProductUpdateInput, SeoInput};

/// Fixed value of the `dropshipping.aliexpress` metafield.
const OVERSEAS_SHIPPING: &str = "海外発送";

/// Content produced by the model for one product.
///
/// Field names match the JSON keys the prompt asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    /// New product title.
    pub title: String,
    /// New description (HTML).
    pub body_html: String,
    /// SEO title, ending in the shop suffix.
    pub seo_title: String,
    /// SEO meta description.
    pub seo_description: String,
    /// Structured specifications.
    #[serde(default)]
    pub specs: Specs,
}

/// Size, material, use and power specifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Specs {
    /// Size.
    pub details1: String,
    /// Material.
    pub details2: String,
    /// Use.
    pub details3: String,
    /// Power. Empty when not applicable.
    pub details4: String,
}

/// Breadcrumb categories applied to every product of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumbs {
    /// Top-level category.
    #[serde(default)]
    pub cat_big: Option<String>,
    /// Mid-level category.
    #[serde(default)]
    pub cat_mid: Option<String>,
}

impl GeneratedContent {
    /// Build the `productUpdate` input for this content.
    ///
    /// `template` becomes the product's template suffix when set.
    #[must_use]
    pub fn to_product_update(
        &self,
        id: &ProductGid,
        template: Option<RewriteTemplate>,
    ) -> ProductUpdateInput {
        ProductUpdateInput {
            id: id.to_string(),
            title: Some(self.title.clone()),
            description_html: Some(self.body_html.clone()),
            template_suffix: template.map(|t| t.as_str().to_string()),
            seo: Some(SeoInput {
                title: Some(self.seo_title.clone()),
                description: Some(self.seo_description.clone()),
            }),
        }
    }
}

/// Metafield writes for one product, in a fixed order.
///
/// Entries whose value is blank after trimming are omitted.
#[must_use]
pub fn metafield_entries(
    owner: &ProductGid,
    specs: &Specs,
    breadcrumbs: &Breadcrumbs,
) -> Vec<MetafieldsSetInput> {
    let entries: [(&str, &str, &str, MetafieldType); 7] = [
        ("spec", "details01", specs.details1.as_str(), MetafieldType::MultiLineTextField),
        ("spec", "details02", specs.details2.as_str(), MetafieldType::MultiLineTextField),
        ("spec", "details03", specs.details3.as_str(), MetafieldType::MultiLineTextField),
        ("spec", "details04", specs.details4.as_str(), MetafieldType::MultiLineTextField),
        ("dropshipping", "aliexpress", OVERSEAS_SHIPPING, MetafieldType::SingleLineTextField),
        (
            "breadcrumbs",
            "cat_big",
            breadcrumbs.cat_big.as_deref().unwrap_or_default(),
            MetafieldType::SingleLineTextField,
        ),
        (
            "breadcrumbs",
            "cat_mid",
            breadcrumbs.cat_mid.as_deref().unwrap_or_default(),
            MetafieldType::SingleLineTextField,
        ),
    ];

    entries
        .into_iter()
        .filter(|(_, _, value, _)| !value.trim().is_empty())
        .map(|(namespace, key, value, kind)| MetafieldsSetInput {
            owner_id: owner.to_string(),
            namespace: namespace.to_string(),
            key: key.to_string(),
            kind: kind.as_str().to_string(),
            value: value.to_string(),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product() -> ProductGid {
        ProductGid::parse("gid://shopify/Product/42").unwrap()
    }

    fn keys(entries: &[MetafieldsSetInput]) -> Vec<String> {
        entries
            .iter()
            .map(|e| format!("{}.{}", e.namespace, e.key))
            .collect()
    }

    #[test]
    fn test_missing_specs_default_to_empty() {
        let content: GeneratedContent = serde_json::from_value(serde_json::json!({
            "title": "T",
            "bodyHtml": "<p>b</p>",
            "seoTitle": "S",
            "seoDescription": "D",
            "specs": {"details1": "10cm"}
        }))
        .unwrap();
        assert_eq!(content.specs.details1, "10cm");
        assert_eq!(content.specs.details4, "");

        let content: GeneratedContent = serde_json::from_value(serde_json::json!({
            "title": "T", "bodyHtml": "", "seoTitle": "", "seoDescription": ""
        }))
        .unwrap();
        assert_eq!(content.specs, Specs::default());
    }

    #[test]
    fn test_all_entries_in_order() {
        let specs = Specs {
            details1: "10cm".to_string(),
            details2: "木".to_string(),
            details3: "収納".to_string(),
            details4: "USB".to_string(),
        };
        let breadcrumbs = Breadcrumbs {
            cat_big: Some("インテリア".to_string()),
            cat_mid: Some("収納".to_string()),
        };
        let entries = metafield_entries(&product(), &specs, &breadcrumbs);
        assert_eq!(
            keys(&entries),
            [
                "spec.details01",
                "spec.details02",
                "spec.details03",
                "spec.details04",
                "dropshipping.aliexpress",
                "breadcrumbs.cat_big",
                "breadcrumbs.cat_mid",
            ]
        );
        assert_eq!(entries[0].kind, "multi_line_text_field");
        assert_eq!(entries[4].value, "海外発送");
        assert_eq!(entries[4].kind, "single_line_text_field");
        assert!(entries.iter().all(|e| e.owner_id == "gid://shopify/Product/42"));
    }

    #[test]
    fn test_blank_values_are_omitted() {
        let specs = Specs {
            details1: "10cm".to_string(),
            details2: "木".to_string(),
            details3: "収納".to_string(),
            details4: "   ".to_string(),
        };
        let breadcrumbs = Breadcrumbs {
            cat_big: Some(String::new()),
            cat_mid: None,
        };
        let entries = metafield_entries(&product(), &specs, &breadcrumbs);
        assert_eq!(
            keys(&entries),
            [
                "spec.details01",
                "spec.details02",
                "spec.details03",
                "dropshipping.aliexpress",
            ]
        );
    }

    #[test]
    fn test_product_update_carries_template_suffix() {
        let content = GeneratedContent {
            title: "T".to_string(),
            body_html: "<p>b</p>".to_string(),
            seo_title: "S".to_string(),
            seo_description: "D".to_string(),
            specs: Specs::default(),
        };
        let input = content.to_product_update(&product(), Some(RewriteTemplate::Alibaba));
        assert_eq!(input.template_suffix.as_deref(), Some("alibaba"));
        assert_eq!(input.seo.unwrap().title.as_deref(), Some("S"));

        let input = content.to_product_update(&product(), None);
        assert!(input.template_suffix.is_none());
    }
}
