//! Customer queries for [`PgCatalogStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use catalogos_core::{CustomerChanges, CustomerId, Email, NewCustomer, Page, TaxId};

use super::{CustomerStore, PgCatalogStore, RepositoryError, map_unique_violation};
use crate::models::Customer;

const DUPLICATE_TAX_ID: &str = "a customer with this tax_id already exists";

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: i32,
    name: String,
    trade_name: Option<String>,
    tax_id: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let tax_id = row
            .tax_id
            .as_deref()
            .map(TaxId::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid tax_id in database: {e}"))
            })?;
        let email = row
            .email
            .as_deref()
            .map(Email::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
            })?;

        Ok(Self {
            id: CustomerId::new(row.id),
            name: row.name,
            trade_name: row.trade_name,
            tax_id,
            email,
            phone: row.phone,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl CustomerStore for PgCatalogStore {
    async fn create_customer(&self, draft: NewCustomer) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            INSERT INTO customers (name, trade_name, tax_id, email, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, trade_name, tax_id, email, phone, created_at, updated_at
            ",
        )
        .bind(&draft.name)
        .bind(draft.trade_name.as_deref())
        .bind(draft.tax_id.as_ref().map(TaxId::as_str))
        .bind(draft.email.as_ref().map(Email::as_str))
        .bind(draft.phone.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_TAX_ID))?;

        row.try_into()
    }

    async fn list_customers(&self, page: Page) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, name, trade_name, tax_id, email, phone, created_at, updated_at
            FROM customers
            ORDER BY id
            OFFSET $1
            LIMIT $2
            ",
        )
        .bind(page.offset)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Customer::try_from).collect()
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, name, trade_name, tax_id, email, phone, created_at, updated_at
            FROM customers
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Customer::try_from).transpose()
    }

    async fn update_customer(
        &self,
        id: CustomerId,
        changes: CustomerChanges,
    ) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            UPDATE customers
            SET name = COALESCE($2, name),
                trade_name = COALESCE($3, trade_name),
                tax_id = COALESCE($4, tax_id),
                email = COALESCE($5, email),
                phone = COALESCE($6, phone),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, trade_name, tax_id, email, phone, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.trade_name.as_deref())
        .bind(changes.tax_id.as_ref().map(TaxId::as_str))
        .bind(changes.email.as_ref().map(Email::as_str))
        .bind(changes.phone.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_TAX_ID))?;

        row.ok_or_else(|| RepositoryError::NotFound(format!("customer {id}")))?
            .try_into()
    }

    async fn delete_customer(&self, id: CustomerId) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let locked = sqlx::query_scalar::<_, i32>(
            "SELECT id FROM customers WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        if locked.is_none() {
            return Err(RepositoryError::NotFound(format!("customer {id}")));
        }

        let removed = sqlx::query("DELETE FROM addresses WHERE customer_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::Conflict(format!(
                        "customer {id} still has addresses"
                    ));
                }
                RepositoryError::Database(e)
            })?;

        tx.commit().await?;

        tracing::debug!(customer_id = %id, addresses_deleted = removed, "Deleted customer");
        Ok(removed)
    }
}
