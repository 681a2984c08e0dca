//! Cafe repository for database operations.

use sqlx::SqlitePool;
use tracing::instrument;

use cafe_core::CafeId;

use super::{RepositoryError, conflict_or_database};
use crate::models::{Cafe, NewCafe};

const CAFE_COLUMNS: &str = "id, name, map_url, img_url, location, has_sockets, has_toilet, \
                            has_wifi, can_take_calls, seats, coffee_price";

/// Raw `cafe` row.
#[derive(Debug, sqlx::FromRow)]
struct CafeRow {
    id: CafeId,
    name: String,
    map_url: String,
    img_url: String,
    location: String,
    has_sockets: bool,
    has_toilet: bool,
    has_wifi: bool,
    can_take_calls: bool,
    seats: Option<String>,
    coffee_price: Option<String>,
}

impl From<CafeRow> for Cafe {
    fn from(r: CafeRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            map_url: r.map_url,
            img_url: r.img_url,
            location: r.location,
            has_sockets: r.has_sockets,
            has_toilet: r.has_toilet,
            has_wifi: r.has_wifi,
            can_take_calls: r.can_take_calls,
            seats: r.seats,
            coffee_price: r.coffee_price,
        }
    }
}

/// Repository for cafe database operations.
pub struct CafeRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CafeRepository<'a> {
    /// Create a new cafe repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List every cafe in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Cafe>, RepositoryError> {
        let rows: Vec<CafeRow> =
            sqlx::query_as(&format!("SELECT {CAFE_COLUMNS} FROM cafe ORDER BY id ASC"))
                .fetch_all(self.pool)
                .await?;

        Ok(rows.into_iter().map(Cafe::from).collect())
    }

    /// Get a cafe by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: CafeId) -> Result<Option<Cafe>, RepositoryError> {
        let row: Option<CafeRow> =
            sqlx::query_as(&format!("SELECT {CAFE_COLUMNS} FROM cafe WHERE id = ?1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(Cafe::from))
    }

    /// Insert a validated cafe.
    ///
    /// Runs in its own transaction; it is rolled back if anything fails
    /// before the commit.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a cafe with the same name exists.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, cafe), fields(name = %cafe.name))]
    pub async fn create(&self, cafe: &NewCafe) -> Result<Cafe, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: CafeRow = sqlx::query_as(&format!(
            r"
            INSERT INTO cafe (name, map_url, img_url, location, has_sockets, has_toilet,
                              has_wifi, can_take_calls, seats, coffee_price)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            RETURNING {CAFE_COLUMNS}
            "
        ))
        .bind(&cafe.name)
        .bind(&cafe.map_url)
        .bind(&cafe.img_url)
        .bind(&cafe.location)
        .bind(cafe.has_sockets)
        .bind(cafe.has_toilet)
        .bind(cafe.has_wifi)
        .bind(cafe.can_take_calls)
        .bind(cafe.seats.as_deref())
        .bind(cafe.coffee_price.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_or_database(e, "cafe name"))?;

        tx.commit().await?;

        tracing::info!(cafe_id = %row.id, "Cafe created");
        Ok(row.into())
    }

    /// Count stored cafes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cafe")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support;

    fn new_cafe(name: &str) -> NewCafe {
        NewCafe {
            name: name.to_string(),
            map_url: "https://maps.example.com/?q=cafe".to_string(),
            img_url: "https://img.example.com/cafe.jpg".to_string(),
            location: "Peckham".to_string(),
            has_sockets: true,
            has_toilet: false,
            has_wifi: true,
            can_take_calls: true,
            seats: Some("20-30".to_string()),
            coffee_price: Some("£2.40".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_and_list() {
        let pool = test_support::pool().await;
        let repo = CafeRepository::new(&pool);

        let created = repo.create(&new_cafe("Science Gallery")).await.unwrap();
        assert_eq!(created.name, "Science Gallery");
        assert!(created.has_sockets);
        assert!(!created.has_toilet);
        assert!(created.can_take_calls);
        assert_eq!(created.seats.as_deref(), Some("20-30"));

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        let all = repo.list().await.unwrap();
        assert_eq!(all, vec![created]);
    }

    #[tokio::test]
    async fn test_list_is_in_insertion_order() {
        let pool = test_support::pool().await;
        let repo = CafeRepository::new(&pool);

        repo.create(&new_cafe("B Cafe")).await.unwrap();
        repo.create(&new_cafe("A Cafe")).await.unwrap();

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["B Cafe", "A Cafe"]);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let pool = test_support::pool().await;
        let repo = CafeRepository::new(&pool);

        assert!(repo.get_by_id(CafeId::new(999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts_and_leaves_store_unchanged() {
        let pool = test_support::pool().await;
        let repo = CafeRepository::new(&pool);

        repo.create(&new_cafe("Twin")).await.unwrap();
        let mut duplicate = new_cafe("Twin");
        duplicate.location = "Elsewhere".to_string();

        let err = repo.create(&duplicate).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(repo.count().await.unwrap(), 1);
        assert_eq!(repo.list().await.unwrap()[0].location, "Peckham");
    }

    #[tokio::test]
    async fn test_optional_fields_may_be_absent() {
        let pool = test_support::pool().await;
        let repo = CafeRepository::new(&pool);

        let mut cafe = new_cafe("Bare");
        cafe.seats = None;
        cafe.coffee_price = None;

        let created = repo.create(&cafe).await.unwrap();
        assert_eq!(created.seats, None);
        assert_eq!(created.coffee_price, None);
    }
}
