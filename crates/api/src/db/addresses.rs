//! Address queries for [`PgCatalogStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use catalogos_core::{AddressChanges, AddressId, AddressKind, CustomerId, NewAddress};

use super::{AddressStore, PgCatalogStore, RepositoryError};
use crate::models::Address;

#[derive(sqlx::FromRow)]
struct AddressRow {
    id: i32,
    customer_id: i32,
    street: String,
    neighborhood: Option<String>,
    locality: Option<String>,
    state: Option<String>,
    postal_code: Option<String>,
    kind: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AddressRow> for Address {
    type Error = RepositoryError;

    fn try_from(row: AddressRow) -> Result<Self, Self::Error> {
        let kind = match row.kind.as_deref() {
            Some(value) => Some(AddressKind::from_db(value).ok_or_else(|| {
                RepositoryError::DataCorruption(format!("invalid address kind in database: {value}"))
            })?),
            None => None,
        };

        Ok(Self {
            id: AddressId::new(row.id),
            customer_id: CustomerId::new(row.customer_id),
            street: row.street,
            neighborhood: row.neighborhood,
            locality: row.locality,
            state: row.state,
            postal_code: row.postal_code,
            kind,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl AddressStore for PgCatalogStore {
    async fn create_address(
        &self,
        customer_id: CustomerId,
        draft: NewAddress,
    ) -> Result<Address, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(
            r"
            INSERT INTO addresses (customer_id, street, neighborhood, locality, state, postal_code, kind)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, customer_id, street, neighborhood, locality, state, postal_code, kind,
                      created_at, updated_at
            ",
        )
        .bind(customer_id)
        .bind(&draft.street)
        .bind(draft.neighborhood.as_deref())
        .bind(draft.locality.as_deref())
        .bind(draft.state.as_deref())
        .bind(draft.postal_code.as_deref())
        .bind(draft.kind.map(AddressKind::as_str))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound(format!("customer {customer_id}"));
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    async fn list_addresses(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Address>, RepositoryError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM customers WHERE id = $1)")
                .bind(customer_id)
                .fetch_one(&self.pool)
                .await?;
        if !exists {
            return Err(RepositoryError::NotFound(format!("customer {customer_id}")));
        }

        let rows = sqlx::query_as::<_, AddressRow>(
            r"
            SELECT id, customer_id, street, neighborhood, locality, state, postal_code, kind,
                   created_at, updated_at
            FROM addresses
            WHERE customer_id = $1
            ORDER BY id
            ",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Address::try_from).collect()
    }

    async fn get_address(&self, id: AddressId) -> Result<Option<Address>, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(
            r"
            SELECT id, customer_id, street, neighborhood, locality, state, postal_code, kind,
                   created_at, updated_at
            FROM addresses
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Address::try_from).transpose()
    }

    async fn update_address(
        &self,
        id: AddressId,
        changes: AddressChanges,
    ) -> Result<Address, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(
            r"
            UPDATE addresses
            SET street = COALESCE($2, street),
                neighborhood = COALESCE($3, neighborhood),
                locality = COALESCE($4, locality),
                state = COALESCE($5, state),
                postal_code = COALESCE($6, postal_code),
                kind = COALESCE($7, kind),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, customer_id, street, neighborhood, locality, state, postal_code, kind,
                      created_at, updated_at
            ",
        )
        .bind(id)
        .bind(changes.street.as_deref())
        .bind(changes.neighborhood.as_deref())
        .bind(changes.locality.as_deref())
        .bind(changes.state.as_deref())
        .bind(changes.postal_code.as_deref())
        .bind(changes.kind.map(AddressKind::as_str))
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| RepositoryError::NotFound(format!("address {id}")))?
            .try_into()
    }

    async fn delete_address(&self, id: AddressId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("address {id}")));
        }
        Ok(())
    }
}
