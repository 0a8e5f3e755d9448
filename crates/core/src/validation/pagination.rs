//! List pagination (`?skip=&limit=`).

use serde::Deserialize;

use super::{ValidationErrors, Validator};

/// Raw query-string parameters for list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ListParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// A validated window over an id-ordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: i64,
    pub limit: i64,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 100;
    pub const MAX_LIMIT: i64 = 1000;
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

impl ListParams {
    /// Validate `skip >= 0` and `1 <= limit <= 1000`.
    ///
    /// # Errors
    ///
    /// Returns field errors for out-of-range values.
    pub fn into_page(self) -> Result<Page, ValidationErrors> {
        let mut v = Validator::default();
        let offset = self.skip.unwrap_or(0);
        if offset < 0 {
            v.reject("skip", "must be greater than or equal to 0");
        }
        let limit = self.limit.unwrap_or(Page::DEFAULT_LIMIT);
        if !(1..=Page::MAX_LIMIT).contains(&limit) {
            v.reject(
                "limit",
                format!("must be between 1 and {}", Page::MAX_LIMIT),
            );
        }
        v.finish(Page { offset, limit })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(ListParams::default().into_page().unwrap(), Page::default());
    }

    #[test]
    fn test_explicit_window() {
        let page = ListParams {
            skip: Some(20),
            limit: Some(5),
        }
        .into_page()
        .unwrap();
        assert_eq!(page, Page { offset: 20, limit: 5 });
    }

    #[test]
    fn test_out_of_range() {
        let errors = ListParams {
            skip: Some(-1),
            limit: Some(0),
        }
        .into_page()
        .unwrap_err();
        assert!(errors.has_field("skip"));
        assert!(errors.has_field("limit"));
        assert!(
            ListParams {
                skip: None,
                limit: Some(1001)
            }
            .into_page()
            .is_err()
        );
    }
}
