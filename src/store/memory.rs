use tokio::sync::RwLock;

use super::{index_not_found, TableStore};
use crate::{
    error::AppResult,
    models::{RankedRecommendation, RestaurantRecord, VisitRecord},
};

#[derive(Default)]
struct Tables {
    restaurants: Vec<RestaurantRecord>,
    history: Vec<VisitRecord>,
    recommendations: Vec<RankedRecommendation>,
}

/// Process-local tables, lost on restart
#[derive(Default)]
pub struct MemoryTableStore {
    tables: RwLock<Tables>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The ranking most recently passed to `export_recommendations`
    pub async fn recommendations(&self) -> Vec<RankedRecommendation> {
        self.tables.read().await.recommendations.clone()
    }
}

#[async_trait::async_trait]
impl TableStore for MemoryTableStore {
    async fn restaurants(&self) -> AppResult<Vec<RestaurantRecord>> {
        Ok(self.tables.read().await.restaurants.clone())
    }

    async fn add_restaurant(&self, restaurant: RestaurantRecord) -> AppResult<()> {
        self.tables.write().await.restaurants.push(restaurant);
        Ok(())
    }

    async fn remove_restaurant(&self, index: usize) -> AppResult<RestaurantRecord> {
        let mut tables = self.tables.write().await;
        if index >= tables.restaurants.len() {
            return Err(index_not_found(index, tables.restaurants.len()));
        }
        Ok(tables.restaurants.remove(index))
    }

    async fn clear_restaurants(&self) -> AppResult<()> {
        self.tables.write().await.restaurants.clear();
        Ok(())
    }

    async fn history(&self) -> AppResult<Vec<VisitRecord>> {
        Ok(self.tables.read().await.history.clone())
    }

    async fn append_visit(&self, visit: VisitRecord) -> AppResult<()> {
        self.tables.write().await.history.push(visit);
        Ok(())
    }

    async fn export_recommendations(&self, ranked: &[RankedRecommendation]) -> AppResult<()> {
        self.tables.write().await.recommendations = ranked.to_vec();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
