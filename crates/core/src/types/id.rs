//! Newtype global IDs for type-safe Shopify resource references.
//!
//! Shopify identifies every resource with an opaque global ID of the form
//! `gid://shopify/<Resource>/<numeric>`. Use the `define_gid!` macro to create
//! wrappers that prevent accidentally mixing IDs from different resources.

use thiserror::Error;

/// Prefix shared by every Shopify global ID.
pub const GID_PREFIX: &str = "gid://shopify/";

/// Errors that can occur when parsing a global ID.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GidError {
    /// The input string is empty.
    #[error("id cannot be empty")]
    Empty,
    /// The ID belongs to a different resource type.
    #[error("expected a {expected} id, got '{found}'")]
    WrongResource {
        /// Resource the caller asked for.
        expected: &'static str,
        /// The rejected input.
        found: String,
    },
    /// The trailing segment is not a positive integer.
    #[error("id '{0}' does not end in a numeric segment")]
    NotNumeric(String),
}

/// Macro to define a type-safe global ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` as the plain gid string (validated on input)
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `parse()` accepting either the full gid or the bare numeric ID
/// - `as_str()` and `numeric()` accessors
///
/// # Example
///
/// ```rust
/// # use homare_core::define_gid;
/// define_gid!(VariantGid, "ProductVariant");
///
/// let id = VariantGid::parse("42").unwrap();
/// assert_eq!(id.as_str(), "gid://shopify/ProductVariant/42");
/// ```
#[macro_export]
macro_rules! define_gid {
    ($name:ident, $resource:literal) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Shopify resource name embedded in the gid.
            pub const RESOURCE: &'static str = $resource;

            /// Parse a global ID, accepting the bare numeric form as shorthand.
            ///
            /// # Errors
            ///
            /// Returns an error if the input is empty, names another resource,
            /// or does not end in a numeric segment.
            pub fn parse(s: &str) -> Result<Self, $crate::types::id::GidError> {
                let s = s.trim();
                if s.is_empty() {
                    return Err($crate::types::id::GidError::Empty);
                }

                let numeric = if s.chars().all(|c| c.is_ascii_digit()) {
                    s
                } else {
                    let prefix = format!("{}{}/", $crate::types::id::GID_PREFIX, $resource);
                    s.strip_prefix(prefix.as_str()).ok_or_else(|| {
                        $crate::types::id::GidError::WrongResource {
                            expected: $resource,
                            found: s.to_owned(),
                        }
                    })?
                };

                if numeric.is_empty() || !numeric.chars().all(|c| c.is_ascii_digit()) {
                    return Err($crate::types::id::GidError::NotNumeric(s.to_owned()));
                }

                Ok(Self(format!(
                    "{}{}/{}",
                    $crate::types::id::GID_PREFIX,
                    $resource,
                    numeric
                )))
            }

            /// Returns the full gid string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the numeric tail of the gid (used in admin deep links).
            #[must_use]
            pub fn numeric(&self) -> &str {
                self.0.rsplit('/').next().unwrap_or_default()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::GidError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::types::id::GidError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::parse(&s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_gid!(ProductGid, "Product");
define_gid!(CollectionGid, "Collection");
