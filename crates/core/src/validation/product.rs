//! Product payload rules.

use serde::{Deserialize, Serialize};

use super::{ValidationErrors, Validator};
use crate::Price;

const NAME_MAX: usize = 255;
const UNIT_MAX: usize = 50;

/// JSON body accepted by `POST /productos` and `PUT /productos/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductPayload {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
}

/// A validated product ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub unit: Option<String>,
    pub price: Price,
    pub stock: i32,
}

/// Validated partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub price: Option<Price>,
    pub stock: Option<i32>,
}

fn check_price(v: &mut Validator, value: f64) -> Option<Price> {
    match Price::from_f64(value) {
        Ok(price) => Some(price),
        Err(e) => {
            v.reject("price", e.to_string());
            None
        }
    }
}

fn check_stock(v: &mut Validator, value: i64) -> Option<i32> {
    match i32::try_from(value) {
        Ok(stock) if stock >= 0 => Some(stock),
        Ok(_) => {
            v.reject("stock", "must be greater than or equal to 0");
            None
        }
        Err(_) => {
            v.reject("stock", format!("must be at most {}", i32::MAX));
            None
        }
    }
}

impl ProductPayload {
    /// Validate a create request. `stock` defaults to zero.
    ///
    /// # Errors
    ///
    /// Returns every field error found in the payload.
    pub fn into_new(self) -> Result<NewProduct, ValidationErrors> {
        let mut v = Validator::default();
        let name = v.required_text("name", self.name, NAME_MAX);
        let unit = v.optional_text("unit", self.unit, UNIT_MAX);
        let price = match self.price {
            Some(value) => check_price(&mut v, value).unwrap_or_else(Price::zero),
            None => {
                v.reject("price", "is required");
                Price::zero()
            }
        };
        let stock = self
            .stock
            .map_or(Some(0), |value| check_stock(&mut v, value))
            .unwrap_or_default();

        v.finish(NewProduct {
            name,
            unit,
            price,
            stock,
        })
    }

    /// Validate an update request.
    ///
    /// # Errors
    ///
    /// Returns every field error found in the payload.
    pub fn into_changes(self) -> Result<ProductChanges, ValidationErrors> {
        let mut v = Validator::default();
        let name = v.optional_text("name", self.name, NAME_MAX);
        let unit = v.optional_text("unit", self.unit, UNIT_MAX);
        let price = self.price.and_then(|value| check_price(&mut v, value));
        let stock = self.stock.and_then(|value| check_stock(&mut v, value));

        v.finish(ProductChanges {
            name,
            unit,
            price,
            stock,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ProductPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_widget() {
        let draft = parse(r#"{"name":"Widget","price":9.99,"stock":10}"#)
            .into_new()
            .unwrap();
        assert_eq!(draft.name, "Widget");
        assert_eq!(draft.price, Price::from_f64(9.99).unwrap());
        assert_eq!(draft.stock, 10);
    }

    #[test]
    fn test_zero_price_is_accepted() {
        let draft = parse(r#"{"name":"Free","price":0}"#).into_new().unwrap();
        assert_eq!(draft.price, Price::zero());
        assert_eq!(draft.stock, 0);
    }

    #[test]
    fn test_negative_price_is_rejected() {
        for json in [
            r#"{"name":"Bad","price":-5}"#,
            r#"{"name":"Bad","price":-1}"#,
        ] {
            assert!(parse(json).into_new().unwrap_err().has_field("price"));
        }
    }

    #[test]
    fn test_missing_price_and_name() {
        let errors = parse(r#"{"stock":3}"#).into_new().unwrap_err();
        assert!(errors.has_field("price"));
        assert!(errors.has_field("name"));
    }

    #[test]
    fn test_stock_range() {
        let errors = parse(r#"{"name":"A","price":1,"stock":-1}"#)
            .into_new()
            .unwrap_err();
        assert!(errors.has_field("stock"));
        let errors = parse(r#"{"name":"A","price":1,"stock":3000000000}"#)
            .into_new()
            .unwrap_err();
        assert!(errors.has_field("stock"));
    }

    #[test]
    fn test_wrong_types() {
        assert!(serde_json::from_str::<ProductPayload>(r#"{"price":"cheap"}"#).is_err());
        assert!(serde_json::from_str::<ProductPayload>(r#"{"stock":1.5}"#).is_err());
    }

    #[test]
    fn test_update_rules() {
        let changes = parse(r#"{"price":0}"#).into_changes().unwrap();
        assert_eq!(changes.price, Some(Price::zero()));
        assert!(changes.name.is_none());

        let errors = parse(r#"{"price":-1,"name":""}"#).into_changes().unwrap_err();
        assert!(errors.has_field("price"));
        assert!(errors.has_field("name"));
    }
}
