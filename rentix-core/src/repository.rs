use async_trait::async_trait;

use crate::models::Rent;
use crate::BoxError;

/// Repository trait for rent document access.
///
/// Implementations provide per-document atomicity only; the workflow never
/// relies on multi-document transactions.
#[async_trait]
pub trait RentRepository: Send + Sync {
    /// Persist a new rent and return it with its assigned id.
    async fn create(&self, rent: &Rent) -> Result<Rent, BoxError>;

    async fn get(&self, id: &str) -> Result<Option<Rent>, BoxError>;

    /// Page through rents. `page` is 1-based; returns the page plus the
    /// total number of rents.
    async fn list(&self, page: i64, per_page: i64) -> Result<(Vec<Rent>, i64), BoxError>;

    /// Replace the rent with the given id. `None` when the id is absent.
    async fn update(&self, id: &str, rent: &Rent) -> Result<Option<Rent>, BoxError>;

    /// Delete the rent with the given id. `false` when the id is absent.
    async fn delete(&self, id: &str) -> Result<bool, BoxError>;
}
