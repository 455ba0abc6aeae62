//! Catalog query builder.
//!
//! Builds a structured GROQ query from the listing's URL parameters. The
//! order clause can only come from [`SortOrder`], and the search term only
//! ever travels as the bound `$search` parameter, so nothing a visitor types
//! reaches a structural position of the query.

use std::cmp::Ordering;

use ninja_cats_core::{Product, SearchTerm, SortOrder};
use tracing::debug;

/// Document type of catalog products in the content service.
pub const PRODUCT_DOCUMENT_TYPE: &str = "course";

/// Name of the bound search parameter.
pub const SEARCH_PARAM: &str = "search";

/// A catalog listing query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CatalogQuery {
    search: Option<SearchTerm>,
    order: Option<SortOrder>,
}

impl CatalogQuery {
    /// Build a query from already validated options.
    #[must_use]
    pub const fn build(search: Option<SearchTerm>, order: Option<SortOrder>) -> Self {
        Self { search, order }
    }

    /// Build a query from raw URL parameters.
    ///
    /// A blank search is dropped. An `order` outside the whitelist is ignored
    /// entirely (no partial escaping), leaving the catalog in source order.
    #[must_use]
    pub fn from_params(search: Option<&str>, order: Option<&str>) -> Self {
        let order = order.and_then(|raw| match raw.parse::<SortOrder>() {
            Ok(order) => Some(order),
            Err(e) => {
                debug!(error = %e, "Ignoring order parameter");
                None
            }
        });

        Self {
            search: search.and_then(SearchTerm::parse),
            order,
        }
    }

    /// The search term, if any.
    #[must_use]
    pub const fn search(&self) -> Option<&SearchTerm> {
        self.search.as_ref()
    }

    /// The sort order, if any.
    #[must_use]
    pub const fn order(&self) -> Option<SortOrder> {
        self.order
    }

    /// Render the GROQ expression.
    #[must_use]
    pub fn to_groq(&self) -> String {
        let mut groq = format!("*[_type == \"{PRODUCT_DOCUMENT_TYPE}\"");
        if self.search.is_some() {
            groq.push_str(&format!(
                " && (title match ${SEARCH_PARAM} || description match ${SEARCH_PARAM})"
            ));
        }
        groq.push(']');
        if let Some(order) = self.order {
            groq.push_str(&format!(" | order({})", order.token()));
        }
        groq
    }

    /// Bound parameters for [`Self::to_groq`].
    ///
    /// The search term gets a trailing wildcard so partial words match.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        self.search
            .as_ref()
            .map(|term| vec![(SEARCH_PARAM, format!("{}*", term.as_str()))])
            .unwrap_or_default()
    }

    /// Evaluate the filter predicate against a product.
    ///
    /// Matches when the search term is a case-insensitive substring of the
    /// title or the description. Without a search term everything matches.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let Some(term) = &self.search else {
            return true;
        };
        let needle = term.as_str().to_lowercase();
        product.title.to_lowercase().contains(&needle)
            || product.description.to_lowercase().contains(&needle)
    }

    /// Filter and sort an in-memory product list the way the content
    /// service would. Sorting is stable.
    #[must_use]
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        let mut matched: Vec<Product> = products.into_iter().filter(|p| self.matches(p)).collect();
        if let Some(order) = self.order {
            matched.sort_by(|a, b| compare(order, a, b));
        }
        matched
    }
}

fn compare(order: SortOrder, a: &Product, b: &Product) -> Ordering {
    match order {
        SortOrder::TitleAsc => a.title.cmp(&b.title),
        SortOrder::TitleDesc => b.title.cmp(&a.title),
        SortOrder::PriceAsc => a.price.cmp(&b.price),
        SortOrder::PriceDesc => b.price.cmp(&a.price),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ninja_cats_core::{Price, ProductId};
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: &str, title: &str, description: &str, cents: i64) -> Product {
        Product {
            id: ProductId::from(id),
            title: title.to_owned(),
            description: description.to_owned(),
            price: Price::new(Decimal::new(cents, 2)).unwrap(),
            stock_quantity: 5,
            image: None,
        }
    }

    fn corpus() -> Vec<Product> {
        vec![
            product("a", "Stealth Basics", "Walking without a sound", 2000),
            product("b", "Wall Running", "Vertical parkour for cats", 3500),
            product("c", "Shuriken Safety", "Handling the STEALTH toys", 1500),
        ]
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_base_query_has_type_filter_only() {
        let query = CatalogQuery::from_params(None, None);
        assert_eq!(query.to_groq(), "*[_type == \"course\"]");
        assert!(query.params().is_empty());
    }

    #[test]
    fn test_search_is_bound_not_interpolated() {
        let query = CatalogQuery::from_params(Some("\"] | delete"), None);
        let groq = query.to_groq();

        assert_eq!(
            groq,
            "*[_type == \"course\" && (title match $search || description match $search)]"
        );
        assert!(!groq.contains("delete"));
        assert_eq!(query.params(), vec![("search", "\"] | delete*".to_owned())]);
    }

    #[test]
    fn test_whitelisted_order_appends_clause() {
        let query = CatalogQuery::from_params(Some("wall"), Some("price desc"));
        assert_eq!(
            query.to_groq(),
            "*[_type == \"course\" && (title match $search || description match $search)] | order(price desc)"
        );
    }

    #[test]
    fn test_unknown_order_leaves_query_untouched() {
        let baseline = CatalogQuery::from_params(Some("wall"), None);
        for raw in ["title); drop table x;--", "TITLE ASC", "price", "_id desc", ""] {
            let query = CatalogQuery::from_params(Some("wall"), Some(raw));
            assert_eq!(query.order(), None);
            assert_eq!(query, baseline);
            assert!(!query.to_groq().contains("order("));
        }
    }

    #[test]
    fn test_search_matches_case_insensitive_substring() {
        let products = corpus();

        // exact title
        let exact = CatalogQuery::from_params(Some("Wall Running"), None);
        assert_eq!(ids(&exact.apply(products.clone())), ["b"]);

        // substring in title or description, any case
        let substring = CatalogQuery::from_params(Some("stealth"), None);
        assert_eq!(ids(&substring.apply(products.clone())), ["a", "c"]);

        // no match
        let none = CatalogQuery::from_params(Some("laser pointer"), None);
        assert!(none.apply(products.clone()).is_empty());

        // empty string is no filter at all
        let empty = CatalogQuery::from_params(Some(""), None);
        assert_eq!(empty.search(), None);
        assert_eq!(ids(&empty.apply(products)), ["a", "b", "c"]);
    }

    #[test]
    fn test_apply_sorts_by_whitelisted_order() {
        let by_price = CatalogQuery::from_params(None, Some("price asc"));
        assert_eq!(ids(&by_price.apply(corpus())), ["c", "a", "b"]);

        let by_title_desc = CatalogQuery::from_params(None, Some("title desc"));
        assert_eq!(ids(&by_title_desc.apply(corpus())), ["b", "a", "c"]);
    }

    #[test]
    fn test_apply_without_order_keeps_source_order() {
        let query = CatalogQuery::from_params(None, Some("bogus"));
        assert_eq!(ids(&query.apply(corpus())), ["a", "b", "c"]);
    }
}
