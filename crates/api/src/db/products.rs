//! Product queries for [`PgCatalogStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use catalogos_core::{NewProduct, Page, Price, ProductChanges, ProductId};

use super::{PgCatalogStore, ProductStore, RepositoryError};
use crate::models::Product;

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    unit: Option<String>,
    price: Decimal,
    stock: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid price in database: {e}")))?;
        if row.stock < 0 {
            return Err(RepositoryError::DataCorruption(format!(
                "negative stock in database: {}",
                row.stock
            )));
        }

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            unit: row.unit,
            price,
            stock: row.stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl ProductStore for PgCatalogStore {
    async fn create_product(&self, draft: NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO products (name, unit, price, stock)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, unit, price, stock, created_at, updated_at
            ",
        )
        .bind(&draft.name)
        .bind(draft.unit.as_deref())
        .bind(draft.price.amount())
        .bind(draft.stock)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn list_products(&self, page: Page) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, unit, price, stock, created_at, updated_at
            FROM products
            ORDER BY id
            OFFSET $1
            LIMIT $2
            ",
        )
        .bind(page.offset)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, unit, price, stock, created_at, updated_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    async fn update_product(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE products
            SET name = COALESCE($2, name),
                unit = COALESCE($3, unit),
                price = COALESCE($4, price),
                stock = COALESCE($5, stock),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, unit, price, stock, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.unit.as_deref())
        .bind(changes.price.map(|p| p.amount()))
        .bind(changes.stock)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| RepositoryError::NotFound(format!("product {id}")))?
            .try_into()
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("product {id}")));
        }
        Ok(())
    }
}
