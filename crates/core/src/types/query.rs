//! Catalog listing options that arrive from URL parameters.
//!
//! Both types are validated at the boundary so the query builder never sees
//! raw user input in a structural position.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned for an `order` token outside the whitelist.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported sort order: {0:?}")]
pub struct SortOrderError(String);

/// Whitelisted catalog sort orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SortOrder {
    TitleAsc,
    TitleDesc,
    PriceAsc,
    PriceDesc,
}

impl SortOrder {
    /// Every supported order, in the order the sort picker lists them.
    pub const ALL: [Self; 4] = [
        Self::TitleAsc,
        Self::TitleDesc,
        Self::PriceAsc,
        Self::PriceDesc,
    ];

    /// The token used both in the URL and in the query's order clause.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::TitleAsc => "title asc",
            Self::TitleDesc => "title desc",
            Self::PriceAsc => "price asc",
            Self::PriceDesc => "price desc",
        }
    }

    /// Human readable label for the sort picker.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TitleAsc => "A-Z",
            Self::TitleDesc => "Z-A",
            Self::PriceAsc => "Price Ascending",
            Self::PriceDesc => "Price Descending",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for SortOrder {
    type Err = SortOrderError;

    /// Exact match against the whitelist. No trimming, no case folding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|order| order.token() == s)
            .ok_or_else(|| SortOrderError(s.to_owned()))
    }
}

impl TryFrom<String> for SortOrder {
    type Error = SortOrderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SortOrder> for String {
    fn from(order: SortOrder) -> Self {
        order.token().to_owned()
    }
}

/// A trimmed, non-empty free-text search term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Parse a raw search parameter; blank input means "no search".
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    /// Get the term as entered (trimmed).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
