//! Table persistence
//!
//! The recommender itself is storage-agnostic; front ends load both tables through a
//! [`TableStore`] before each request and write new rows back through it.

use crate::{
    error::AppResult,
    models::{RankedRecommendation, RestaurantRecord, VisitRecord},
};

pub mod file;
pub mod memory;

pub use file::FileTableStore;
pub use memory::MemoryTableStore;

/// Storage for the restaurant table and the append-only visit history
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TableStore: Send + Sync {
    /// All saved restaurants in insertion order
    async fn restaurants(&self) -> AppResult<Vec<RestaurantRecord>>;

    async fn add_restaurant(&self, restaurant: RestaurantRecord) -> AppResult<()>;

    /// Removes the restaurant at a 0-based position and returns it
    ///
    /// Fails with `NotFound` when the index is out of range.
    async fn remove_restaurant(&self, index: usize) -> AppResult<RestaurantRecord>;

    async fn clear_restaurants(&self) -> AppResult<()>;

    /// The full visit history in the order it was recorded
    async fn history(&self) -> AppResult<Vec<VisitRecord>>;

    async fn append_visit(&self, visit: VisitRecord) -> AppResult<()>;

    /// Replaces the exported ranking with the latest full candidate table
    async fn export_recommendations(&self, ranked: &[RankedRecommendation]) -> AppResult<()>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}

pub(crate) fn index_not_found(index: usize, len: usize) -> crate::error::AppError {
    crate::error::AppError::NotFound(format!(
        "No restaurant at position {} (table has {} rows)",
        index, len
    ))
}
