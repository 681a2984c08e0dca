//! Cafe submission service.

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::instrument;

use crate::db::{CafeRepository, RepositoryError};
use crate::forms::{CafeForm, ValidationErrors};
use crate::models::Cafe;

/// Message shown on the name field when the name is taken.
pub const DUPLICATE_NAME: &str = "A cafe with that name already exists.";

/// Why a cafe submission was not stored.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// One or more fields failed validation, or the name is taken.
    #[error("invalid submission ({} field errors)", .0.len())]
    Invalid(ValidationErrors),

    /// The store failed for a reason other than a duplicate name.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Validates and stores new cafes.
pub struct CafeService<'a> {
    cafes: CafeRepository<'a>,
}

impl<'a> CafeService<'a> {
    /// Create a new cafe service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            cafes: CafeRepository::new(pool),
        }
    }

    /// Validate a submitted form and store it as a new cafe.
    ///
    /// Nothing is written unless every field is valid. A name collision is
    /// reported as a validation error on `name`.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Invalid` with per-field messages.
    /// Returns `SubmitError::Repository` if the store fails.
    #[instrument(skip(self, form), fields(name = %form.name.trim()))]
    pub async fn submit(&self, form: &CafeForm) -> Result<Cafe, SubmitError> {
        let new_cafe = form.validate().map_err(SubmitError::Invalid)?;

        match self.cafes.create(&new_cafe).await {
            Ok(cafe) => Ok(cafe),
            Err(RepositoryError::Conflict(_)) => {
                let mut errors = ValidationErrors::new();
                errors.add("name", DUPLICATE_NAME);
                Err(SubmitError::Invalid(errors))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support;
    use crate::forms::REQUIRED;

    fn form(name: &str) -> CafeForm {
        CafeForm {
            name: name.to_string(),
            map_url: "https://goo.gl/maps/abc".to_string(),
            img_url: "https://images.example.com/cafe.jpg".to_string(),
            location: "Barbican".to_string(),
            has_sockets: "YES".to_string(),
            has_toilet: "YES".to_string(),
            has_wifi: "NO".to_string(),
            can_take_calls: "NO".to_string(),
            seats: "0-10".to_string(),
            coffee_price: "£2.75".to_string(),
            csrf_token: String::new(),
        }
    }

    #[tokio::test]
    async fn test_submit_stores_cafe() {
        let pool = test_support::pool().await;
        let service = CafeService::new(&pool);

        let cafe = service.submit(&form("Barbican Kitchen")).await.unwrap();
        assert_eq!(cafe.name, "Barbican Kitchen");
        assert!(cafe.has_toilet);
        assert!(!cafe.can_take_calls);

        let stored = CafeRepository::new(&pool).get_by_id(cafe.id).await.unwrap();
        assert_eq!(stored, Some(cafe));
    }

    #[tokio::test]
    async fn test_invalid_form_writes_nothing() {
        let pool = test_support::pool().await;
        let service = CafeService::new(&pool);

        let mut bad = form("Nameless");
        bad.name = String::new();

        let Err(SubmitError::Invalid(errors)) = service.submit(&bad).await else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.get("name"), Some(REQUIRED));
        assert_eq!(CafeRepository::new(&pool).count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_a_field_error() {
        let pool = test_support::pool().await;
        let service = CafeService::new(&pool);

        service.submit(&form("Twin")).await.unwrap();

        let Err(SubmitError::Invalid(errors)) = service.submit(&form("Twin")).await else {
            panic!("expected duplicate name to be rejected");
        };
        assert_eq!(errors.get("name"), Some(DUPLICATE_NAME));
        assert_eq!(CafeRepository::new(&pool).count().await.unwrap(), 1);
    }
}
