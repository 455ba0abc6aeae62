//! Catalog page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use ninja_cats_core::{Product, SortOrder};
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::{CatalogQuery, ImageTransform, ImageUrlBuilder};
use crate::state::AppState;

/// URL parameters of the catalog page.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    pub order: Option<String>,
    pub search: Option<String>,
}

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub price: String,
    pub in_stock: bool,
}

impl ProductCardView {
    fn new(product: &Product, images: &ImageUrlBuilder) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            description: product.description.clone(),
            image_url: product
                .image
                .as_ref()
                .and_then(|image| images.url(image, ImageTransform::CARD)),
            price: product.price.to_string(),
            in_stock: product.is_in_stock(),
        }
    }
}

/// One entry of the sort order select.
#[derive(Clone)]
pub struct OrderOptionView {
    pub token: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    /// Sort order select options; none selected means source order.
    pub order_options: Vec<OrderOptionView>,
    /// Current search text, echoed back into the search box.
    pub search: String,
    /// Product cards in query order.
    pub products: Vec<ProductCardView>,
    /// The catalog could not be loaded.
    pub catalog_unavailable: bool,
}

fn order_options(selected: Option<SortOrder>) -> Vec<OrderOptionView> {
    SortOrder::ALL
        .into_iter()
        .map(|order| OrderOptionView {
            token: order.token(),
            label: order.label(),
            selected: selected == Some(order),
        })
        .collect()
}

/// Display the catalog page.
///
/// A failed catalog fetch renders an empty catalog with a notice rather
/// than an error page.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> IndexTemplate {
    let query = CatalogQuery::from_params(params.search.as_deref(), params.order.as_deref());

    let (products, catalog_unavailable) = match state.catalog().fetch(&query).await {
        Ok(products) => (products, false),
        Err(e) => {
            tracing::error!("Failed to fetch catalog: {e}");
            (Vec::new(), true)
        }
    };

    IndexTemplate {
        order_options: order_options(query.order()),
        search: query
            .search()
            .map(|term| term.as_str().to_owned())
            .unwrap_or_default(),
        products: products
            .iter()
            .map(|product| ProductCardView::new(product, state.images()))
            .collect(),
        catalog_unavailable,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use futures::future::{self, BoxFuture};
    use http_body_util::BodyExt;
    use ninja_cats_core::{ImageRef, OrderSnapshot, Price, ProductId};
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    use super::*;
    use crate::cart::MemoryCartStore;
    use crate::catalog::{Catalog, CatalogError};
    use crate::routes::test_support::{catalog_state, test_config};

    fn product(id: &str, title: &str, cents: i64, stock: i64) -> Product {
        Product {
            id: ProductId::from(id),
            title: title.to_owned(),
            description: format!("{title} for cats"),
            price: Price::new(Decimal::new(cents, 2)).unwrap(),
            stock_quantity: stock,
            image: Some(ImageRef::new(format!("image-{id}-600x600-jpg"))),
        }
    }

    async fn render(state: AppState, uri: &str) -> (StatusCode, String) {
        let response = crate::app(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_renders_cards_in_requested_order() {
        let state = catalog_state(vec![
            product("a", "Wall Running", 3000, 2),
            product("b", "Shuriken Safety", 1250, 0),
        ]);

        let (status, html) = render(state, "/?order=price%20asc").await;
        assert_eq!(status, StatusCode::OK);

        let shuriken = html.find("Shuriken Safety").unwrap();
        let wall = html.find("Wall Running").unwrap();
        assert!(shuriken < wall);
        assert!(html.contains("$12.50"));
        assert!(html.contains("Out of stock"));
        assert!(html.contains("Add to cart"));
        assert!(html.contains(r#"<option value="price asc" selected>"#));
        assert!(html.contains("cdn.sanity.io"));
        assert!(html.contains("a-600x600.jpg?w=300"));
    }

    #[tokio::test]
    async fn test_cards_carry_cart_script_hooks() {
        let state = catalog_state(vec![
            product("a", "Wall Running", 3000, 2),
            product("b", "Shuriken Safety", 1250, 0),
        ]);

        let (_, html) = render(state, "/").await;
        assert!(html.contains(r#"<script src="/static/cart.js" defer></script>"#));
        assert!(html.contains(r#"data-add-to-cart="a""#));
        assert!(!html.contains(r#"data-add-to-cart="b""#));
        assert!(html.contains(r#"data-in-stock="true""#));
        assert!(html.contains(r#"data-in-stock="false""#));
        assert!(html.contains(r#"data-price="$30.00""#));
        assert!(html.contains("data-cart-toggle"));
        assert!(html.contains(r#"id="cart-panel""#));
    }

    #[tokio::test]
    async fn test_serves_cart_script() {
        let state = catalog_state(Vec::new());
        let (status, script) = render(state, "/static/cart.js").await;
        assert_eq!(status, StatusCode::OK);
        assert!(script.contains(r#"const SESSION_KEY = "cartSessionId";"#));
        for path in [
            "/create-cart-session",
            "/get-cart-items",
            "/add-cart-item",
            "/remove-cart-item",
            "/create-order",
        ] {
            assert!(script.contains(path), "{path}");
        }
        assert!(script.contains("CONFIRMATION_MS = 5000"));
    }

    #[tokio::test]
    async fn test_search_filters_and_is_echoed() {
        let state = catalog_state(vec![
            product("a", "Wall Running", 3000, 2),
            product("b", "Shuriken Safety", 1250, 1),
        ]);

        let (_, html) = render(state, "/?search=shuriken").await;
        assert!(html.contains("Shuriken Safety"));
        assert!(!html.contains("Wall Running"));
        assert!(html.contains(r#"value="shuriken""#));
    }

    #[tokio::test]
    async fn test_unknown_order_is_ignored() {
        let state = catalog_state(vec![product("a", "Wall Running", 3000, 2)]);
        let (status, html) = render(state, "/?order=title%20asc%29%20%7C%20delete").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!html.contains("selected>"));
        assert!(html.contains("Wall Running"));
    }

    struct FailingCatalog;

    impl Catalog for FailingCatalog {
        fn fetch<'a>(
            &'a self,
            _query: &'a CatalogQuery,
        ) -> BoxFuture<'a, Result<Vec<Product>, CatalogError>> {
            Box::pin(future::ready(Err(CatalogError::Api {
                status: 503,
                message: "unavailable".to_owned(),
            })))
        }
    }

    #[tokio::test]
    async fn test_catalog_failure_renders_notice() {
        let state = AppState::new(
            test_config(OrderSnapshot::MarkerOnly),
            Arc::new(FailingCatalog),
            Arc::new(MemoryCartStore::new()),
        );

        let (status, html) = render(state, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("catalog-unavailable"));
    }
}
