//! `PostgreSQL` cart store.

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use ninja_cats_core::{CartSessionId, ProductId};
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::instrument;

use super::{CartStore, RepositoryError};

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map constraint violations to `Conflict`, everything else to `Database`.
fn classify(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict("row already exists".to_owned());
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::Conflict("unknown cart session".to_owned());
        }
    }
    RepositoryError::Database(e)
}

/// Cart store backed by the `cart_sessions`, `cart_items`, `orders` and
/// `order_items` tables.
#[derive(Debug, Clone)]
pub struct PgCartStore {
    pool: PgPool,
}

impl PgCartStore {
    /// Create a store on top of a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    #[instrument(skip(self))]
    async fn insert_session(&self, id: CartSessionId) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO cart_sessions (id) VALUES ($1)")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_session(&self, id: CartSessionId) -> Result<bool, RepositoryError> {
        let row: Option<(CartSessionId,)> =
            sqlx::query_as("SELECT id FROM cart_sessions WHERE id = $1 LIMIT 1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.is_some())
    }

    #[instrument(skip(self))]
    async fn select_product_ids(&self, id: CartSessionId) -> Result<Vec<ProductId>, RepositoryError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT product_id FROM cart_items WHERE cart_session_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(product_id,)| ProductId::new(product_id)).collect())
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn insert_item(
        &self,
        product_id: &ProductId,
        session_id: CartSessionId,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO cart_items (product_id, cart_session_id)
            VALUES ($1, $2)
            ON CONFLICT (cart_session_id, product_id) DO NOTHING
            ",
        )
        .bind(product_id.as_str())
        .bind(session_id)
        .execute(&self.pool)
        .await
        .map_err(classify)?;
        Ok(())
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn delete_items(
        &self,
        product_id: &ProductId,
        session_id: CartSessionId,
    ) -> Result<u64, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM cart_items WHERE product_id = $1 AND cart_session_id = $2")
                .bind(product_id.as_str())
                .bind(session_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self, line_items), fields(line_item_count = line_items.len()))]
    async fn insert_order(
        &self,
        session_id: CartSessionId,
        line_items: &[ProductId],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let (order_id,): (i64,) =
            sqlx::query_as("INSERT INTO orders (cart_session_id) VALUES ($1) RETURNING id")
                .bind(session_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(classify)?;

        if !line_items.is_empty() {
            let product_ids: Vec<&str> = line_items.iter().map(ProductId::as_str).collect();
            sqlx::query(
                r"
                INSERT INTO order_items (order_id, product_id)
                SELECT $1, product_id FROM UNNEST($2::text[]) AS product_id
                ",
            )
            .bind(order_id)
            .bind(&product_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

impl CartStore for PgCartStore {
    fn create_session(&self, id: CartSessionId) -> BoxFuture<'_, Result<(), RepositoryError>> {
        self.insert_session(id).boxed()
    }

    fn session_exists(&self, id: CartSessionId) -> BoxFuture<'_, Result<bool, RepositoryError>> {
        self.find_session(id).boxed()
    }

    fn cart_item_product_ids(
        &self,
        id: CartSessionId,
    ) -> BoxFuture<'_, Result<Vec<ProductId>, RepositoryError>> {
        self.select_product_ids(id).boxed()
    }

    fn add_item<'a>(
        &'a self,
        product_id: &'a ProductId,
        session_id: CartSessionId,
    ) -> BoxFuture<'a, Result<(), RepositoryError>> {
        self.insert_item(product_id, session_id).boxed()
    }

    fn remove_item<'a>(
        &'a self,
        product_id: &'a ProductId,
        session_id: CartSessionId,
    ) -> BoxFuture<'a, Result<u64, RepositoryError>> {
        self.delete_items(product_id, session_id).boxed()
    }

    fn create_order<'a>(
        &'a self,
        session_id: CartSessionId,
        line_items: &'a [ProductId],
    ) -> BoxFuture<'a, Result<(), RepositoryError>> {
        self.insert_order(session_id, line_items).boxed()
    }

    fn ping(&self) -> BoxFuture<'_, Result<(), RepositoryError>> {
        async move {
            sqlx::query("SELECT 1").execute(&self.pool).await?;
            Ok(())
        }
        .boxed()
    }
}
