//! In-process catalog store.
//!
//! Mirrors the `PostgreSQL` behavior closely enough to drive the HTTP layer in
//! tests: ids come from per-table sequences that never reuse a value, `tax_id`
//! is unique, and customer deletion cascades to addresses. A single lock
//! guards all three tables so cross-table operations are atomic.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use catalogos_core::{
    AddressChanges, AddressId, CustomerChanges, CustomerId, NewAddress, NewCustomer, NewProduct,
    Page, ProductChanges, ProductId, TaxId,
};

use super::{AddressStore, CatalogStore, CustomerStore, ProductStore, RepositoryError};
use crate::models::{Address, Customer, Product};

const DUPLICATE_TAX_ID: &str = "a customer with this tax_id already exists";

#[derive(Debug, Default)]
struct Tables {
    customers: BTreeMap<CustomerId, Customer>,
    addresses: BTreeMap<AddressId, Address>,
    products: BTreeMap<ProductId, Product>,
    last_customer_id: i32,
    last_address_id: i32,
    last_product_id: i32,
}

impl Tables {
    fn tax_id_taken(&self, tax_id: &TaxId, except: Option<CustomerId>) -> bool {
        self.customers
            .values()
            .any(|c| Some(c.id) != except && c.tax_id.as_ref() == Some(tax_id))
    }
}

/// Catalog store that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    tables: RwLock<Tables>,
}

impl MemoryCatalogStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn window<T: Clone>(rows: impl Iterator<Item = T>, page: Page) -> Vec<T> {
    let skip = usize::try_from(page.offset).unwrap_or(usize::MAX);
    let take = usize::try_from(page.limit).unwrap_or(0);
    rows.skip(skip).take(take).collect()
}

#[async_trait]
impl CustomerStore for MemoryCatalogStore {
    async fn create_customer(&self, draft: NewCustomer) -> Result<Customer, RepositoryError> {
        let mut tables = self.tables.write().await;
        if let Some(tax_id) = &draft.tax_id
            && tables.tax_id_taken(tax_id, None)
        {
            return Err(RepositoryError::Conflict(DUPLICATE_TAX_ID.to_owned()));
        }

        tables.last_customer_id += 1;
        let now = Utc::now();
        let customer = Customer {
            id: CustomerId::new(tables.last_customer_id),
            name: draft.name,
            trade_name: draft.trade_name,
            tax_id: draft.tax_id,
            email: draft.email,
            phone: draft.phone,
            created_at: now,
            updated_at: now,
        };
        tables.customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn list_customers(&self, page: Page) -> Result<Vec<Customer>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(window(tables.customers.values().cloned(), page))
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        Ok(self.tables.read().await.customers.get(&id).cloned())
    }

    async fn update_customer(
        &self,
        id: CustomerId,
        changes: CustomerChanges,
    ) -> Result<Customer, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.customers.contains_key(&id) {
            return Err(RepositoryError::NotFound(format!("customer {id}")));
        }
        if let Some(tax_id) = &changes.tax_id
            && tables.tax_id_taken(tax_id, Some(id))
        {
            return Err(RepositoryError::Conflict(DUPLICATE_TAX_ID.to_owned()));
        }

        let customer = tables
            .customers
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(format!("customer {id}")))?;
        if let Some(name) = changes.name {
            customer.name = name;
        }
        if let Some(trade_name) = changes.trade_name {
            customer.trade_name = Some(trade_name);
        }
        if let Some(tax_id) = changes.tax_id {
            customer.tax_id = Some(tax_id);
        }
        if let Some(email) = changes.email {
            customer.email = Some(email);
        }
        if let Some(phone) = changes.phone {
            customer.phone = Some(phone);
        }
        customer.updated_at = Utc::now();
        Ok(customer.clone())
    }

    async fn delete_customer(&self, id: CustomerId) -> Result<u64, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.customers.remove(&id).is_none() {
            return Err(RepositoryError::NotFound(format!("customer {id}")));
        }
        let before = tables.addresses.len();
        tables.addresses.retain(|_, a| a.customer_id != id);
        let removed = before - tables.addresses.len();
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }
}

#[async_trait]
impl AddressStore for MemoryCatalogStore {
    async fn create_address(
        &self,
        customer_id: CustomerId,
        draft: NewAddress,
    ) -> Result<Address, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.customers.contains_key(&customer_id) {
            return Err(RepositoryError::NotFound(format!("customer {customer_id}")));
        }

        tables.last_address_id += 1;
        let now = Utc::now();
        let address = Address {
            id: AddressId::new(tables.last_address_id),
            customer_id,
            street: draft.street,
            neighborhood: draft.neighborhood,
            locality: draft.locality,
            state: draft.state,
            postal_code: draft.postal_code,
            kind: draft.kind,
            created_at: now,
            updated_at: now,
        };
        tables.addresses.insert(address.id, address.clone());
        Ok(address)
    }

    async fn list_addresses(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Address>, RepositoryError> {
        let tables = self.tables.read().await;
        if !tables.customers.contains_key(&customer_id) {
            return Err(RepositoryError::NotFound(format!("customer {customer_id}")));
        }
        Ok(tables
            .addresses
            .values()
            .filter(|a| a.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn get_address(&self, id: AddressId) -> Result<Option<Address>, RepositoryError> {
        Ok(self.tables.read().await.addresses.get(&id).cloned())
    }

    async fn update_address(
        &self,
        id: AddressId,
        changes: AddressChanges,
    ) -> Result<Address, RepositoryError> {
        let mut tables = self.tables.write().await;
        let address = tables
            .addresses
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(format!("address {id}")))?;

        if let Some(street) = changes.street {
            address.street = street;
        }
        if let Some(neighborhood) = changes.neighborhood {
            address.neighborhood = Some(neighborhood);
        }
        if let Some(locality) = changes.locality {
            address.locality = Some(locality);
        }
        if let Some(state) = changes.state {
            address.state = Some(state);
        }
        if let Some(postal_code) = changes.postal_code {
            address.postal_code = Some(postal_code);
        }
        if let Some(kind) = changes.kind {
            address.kind = Some(kind);
        }
        address.updated_at = Utc::now();
        Ok(address.clone())
    }

    async fn delete_address(&self, id: AddressId) -> Result<(), RepositoryError> {
        self.tables
            .write()
            .await
            .addresses
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(format!("address {id}")))
    }
}

#[async_trait]
impl ProductStore for MemoryCatalogStore {
    async fn create_product(&self, draft: NewProduct) -> Result<Product, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.last_product_id += 1;
        let now = Utc::now();
        let product = Product {
            id: ProductId::new(tables.last_product_id),
            name: draft.name,
            unit: draft.unit,
            price: draft.price,
            stock: draft.stock,
            created_at: now,
            updated_at: now,
        };
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn list_products(&self, page: Page) -> Result<Vec<Product>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(window(tables.products.values().cloned(), page))
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn update_product(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Product, RepositoryError> {
        let mut tables = self.tables.write().await;
        let product = tables
            .products
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(format!("product {id}")))?;

        if let Some(name) = changes.name {
            product.name = name;
        }
        if let Some(unit) = changes.unit {
            product.unit = Some(unit);
        }
        if let Some(price) = changes.price {
            product.price = price;
        }
        if let Some(stock) = changes.stock {
            product.stock = stock;
        }
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), RepositoryError> {
        self.tables
            .write()
            .await
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(format!("product {id}")))
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use catalogos_core::{AddressPayload, CustomerPayload, Price, ProductPayload};

    use super::*;

    fn customer(name: &str, tax_id: Option<&str>) -> NewCustomer {
        CustomerPayload {
            name: Some(name.to_owned()),
            tax_id: tax_id.map(str::to_owned),
            ..CustomerPayload::default()
        }
        .into_new()
        .unwrap()
    }

    fn address(street: &str) -> NewAddress {
        AddressPayload {
            street: Some(street.to_owned()),
            ..AddressPayload::default()
        }
        .into_new()
        .unwrap()
    }

    fn product(name: &str, price: f64) -> NewProduct {
        ProductPayload {
            name: Some(name.to_owned()),
            price: Some(price),
            ..ProductPayload::default()
        }
        .into_new()
        .unwrap()
    }

    #[tokio::test]
    async fn test_ids_are_sequential_and_not_reused() {
        let store = MemoryCatalogStore::new();
        let first = store.create_product(product("A", 1.0)).await.unwrap();
        store.delete_product(first.id).await.unwrap();
        let second = store.create_product(product("B", 1.0)).await.unwrap();
        assert_eq!(first.id.as_i32(), 1);
        assert_eq!(second.id.as_i32(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_tax_id_conflicts() {
        let store = MemoryCatalogStore::new();
        let ana = store
            .create_customer(customer("Ana", Some("XAXX010101000")))
            .await
            .unwrap();
        let err = store
            .create_customer(customer("Beto", Some("XAXX010101000")))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        // Re-submitting a customer's own tax id is not a conflict.
        let changes = CustomerPayload {
            tax_id: Some("XAXX010101000".to_owned()),
            ..CustomerPayload::default()
        }
        .into_changes()
        .unwrap();
        assert!(store.update_customer(ana.id, changes).await.is_ok());
    }

    #[tokio::test]
    async fn test_address_requires_customer() {
        let store = MemoryCatalogStore::new();
        let err = store
            .create_address(CustomerId::new(42), address("Main"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
        assert!(store.get_address(AddressId::new(1)).await.unwrap().is_none());
        assert!(matches!(
            store.list_addresses(CustomerId::new(42)).await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_customer_delete_cascades() {
        let store = MemoryCatalogStore::new();
        let ana = store.create_customer(customer("Ana", None)).await.unwrap();
        let beto = store.create_customer(customer("Beto", None)).await.unwrap();
        let main = store.create_address(ana.id, address("Main")).await.unwrap();
        store.create_address(ana.id, address("Second")).await.unwrap();
        let kept = store.create_address(beto.id, address("Elm")).await.unwrap();

        assert_eq!(store.delete_customer(ana.id).await.unwrap(), 2);
        assert!(store.get_customer(ana.id).await.unwrap().is_none());
        assert!(store.get_address(main.id).await.unwrap().is_none());
        assert!(store.get_address(kept.id).await.unwrap().is_some());
        assert!(matches!(
            store.delete_customer(ana.id).await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_window_is_ordered() {
        let store = MemoryCatalogStore::new();
        for i in 0..5 {
            store
                .create_product(product(&format!("P{i}"), 1.0))
                .await
                .unwrap();
        }
        let page = Page {
            offset: 1,
            limit: 2,
        };
        let names: Vec<_> = store
            .list_products(page)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["P1", "P2"]);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let store = MemoryCatalogStore::new();
        let created = store.create_product(product("Widget", 9.99)).await.unwrap();
        let changes = ProductPayload {
            stock: Some(3),
            ..ProductPayload::default()
        }
        .into_changes()
        .unwrap();
        let updated = store.update_product(created.id, changes).await.unwrap();
        assert_eq!(updated.name, "Widget");
        assert_eq!(updated.price, Price::from_f64(9.99).unwrap());
        assert_eq!(updated.stock, 3);
        assert!(updated.updated_at >= created.updated_at);
    }
}
