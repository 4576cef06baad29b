//! Rewrite style templates.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a template name is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown rewrite template '{0}' (expected 'aliexpress' or 'alibaba')")]
pub struct TemplateError(pub String);

/// Named style profile selecting prompt phrasing for generated content.
///
/// The name also becomes the product's `templateSuffix` when a bulk rewrite
/// writes the generated content back, so the storefront renders the matching
/// product template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RewriteTemplate {
    /// Products imported from AliExpress (the default).
    #[default]
    Aliexpress,
    /// Products imported from Alibaba.
    Alibaba,
}

impl RewriteTemplate {
    /// All templates, in display order.
    pub const ALL: [Self; 2] = [Self::Aliexpress, Self::Alibaba];

    /// Returns the wire name of the template.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aliexpress => "aliexpress",
            Self::Alibaba => "alibaba",
        }
    }

    /// Parse a template name, treating an empty value as the default.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] for any name other than `aliexpress` or `alibaba`.
    pub fn parse_or_default(s: Option<&str>) -> Result<Self, TemplateError> {
        match s.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(name) => name.parse(),
        }
    }
}

impl fmt::Display for RewriteTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RewriteTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aliexpress" => Ok(Self::Aliexpress),
            "alibaba" => Ok(Self::Alibaba),
            _ => Err(TemplateError(s.to_owned())),
        }
    }
}
