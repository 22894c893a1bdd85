use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::Mutex;

use super::{index_not_found, TableStore};
use crate::{
    error::{AppError, AppResult},
    models::{flag, RankedRecommendation, RestaurantRecord, VisitRecord},
};

const RESTAURANTS_FILE: &str = "restaurants.csv";
const HISTORY_FILE: &str = "user_data.csv";
const RECOMMENDATIONS_FILE: &str = "recommendations.csv";

const RESTAURANT_COLUMNS: &[&str] = &["Name", "Cuisine", "Rating", "Price"];
const HISTORY_COLUMNS: &[&str] = &[
    "Name",
    "Cuisine",
    "Rating",
    "Price",
    "Liked",
    "DateVisited",
    "Dish",
    "PersonalRating",
];
const RECOMMENDATION_COLUMNS: &[&str] = &[
    "Name",
    "Cuisine",
    "Rating",
    "Price",
    "Predicted_Like",
    "Confidence",
];

/// One line of the history table
///
/// Records with flattened fields can't go through the csv serializer, so visits are
/// spelled out column by column here.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HistoryRow {
    name: String,
    cuisine: String,
    rating: f64,
    price: u8,
    #[serde(with = "flag")]
    liked: bool,
    date_visited: NaiveDate,
    dish: String,
    personal_rating: u8,
}

impl From<VisitRecord> for HistoryRow {
    fn from(visit: VisitRecord) -> Self {
        Self {
            name: visit.restaurant.name,
            cuisine: visit.restaurant.cuisine,
            rating: visit.restaurant.rating,
            price: visit.restaurant.price,
            liked: visit.liked,
            date_visited: visit.date_visited,
            dish: visit.dish,
            personal_rating: visit.personal_rating,
        }
    }
}

impl From<HistoryRow> for VisitRecord {
    fn from(row: HistoryRow) -> Self {
        Self {
            restaurant: RestaurantRecord::new(row.name, row.cuisine, row.rating, row.price),
            liked: row.liked,
            date_visited: row.date_visited,
            dish: row.dish,
            personal_rating: row.personal_rating,
        }
    }
}

#[derive(Debug, Serialize)]
struct RecommendationRow<'a> {
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Cuisine")]
    cuisine: &'a str,
    #[serde(rename = "Rating")]
    rating: f64,
    #[serde(rename = "Price")]
    price: u8,
    #[serde(rename = "Predicted_Like", with = "flag")]
    predicted_like: bool,
    #[serde(rename = "Confidence")]
    confidence: f64,
}

impl<'a> From<&'a RankedRecommendation> for RecommendationRow<'a> {
    fn from(ranked: &'a RankedRecommendation) -> Self {
        Self {
            name: &ranked.restaurant.name,
            cuisine: &ranked.restaurant.cuisine,
            rating: ranked.restaurant.rating,
            price: ranked.restaurant.price,
            predicted_like: ranked.predicted_like,
            confidence: ranked.confidence,
        }
    }
}

/// Tables persisted as headed CSV files in a data directory
///
/// A missing, blank or header-only file reads as an empty table. Writes go through a temp
/// file and a rename so a crash never leaves a half-written table.
pub struct FileTableStore {
    dir: PathBuf,
    // serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl FileTableStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_table<T: DeserializeOwned>(&self, file: &str) -> AppResult<Vec<T>> {
        let path = self.dir.join(file);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let rows = reader
            .deserialize()
            .collect::<Result<Vec<T>, csv::Error>>()?;
        Ok(rows)
    }

    async fn write_table<T: Serialize>(
        &self,
        file: &str,
        columns: &[&str],
        rows: &[T],
    ) -> AppResult<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        if rows.is_empty() {
            writer.write_record(columns)?;
        }
        for row in rows {
            writer.serialize(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Storage(e.into_error()))?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(file);
        let tmp = self.dir.join(format!("{}.tmp", file));
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::debug!(path = %path.display(), rows = rows.len(), "Table written");
        Ok(())
    }

    async fn read_history(&self) -> AppResult<Vec<VisitRecord>> {
        let rows: Vec<HistoryRow> = self.read_table(HISTORY_FILE).await?;
        Ok(rows.into_iter().map(VisitRecord::from).collect())
    }
}

#[async_trait::async_trait]
impl TableStore for FileTableStore {
    async fn restaurants(&self) -> AppResult<Vec<RestaurantRecord>> {
        self.read_table(RESTAURANTS_FILE).await
    }

    async fn add_restaurant(&self, restaurant: RestaurantRecord) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut rows: Vec<RestaurantRecord> = self.read_table(RESTAURANTS_FILE).await?;
        rows.push(restaurant);
        self.write_table(RESTAURANTS_FILE, RESTAURANT_COLUMNS, &rows)
            .await
    }

    async fn remove_restaurant(&self, index: usize) -> AppResult<RestaurantRecord> {
        let _guard = self.write_lock.lock().await;
        let mut rows: Vec<RestaurantRecord> = self.read_table(RESTAURANTS_FILE).await?;
        if index >= rows.len() {
            return Err(index_not_found(index, rows.len()));
        }
        let removed = rows.remove(index);
        self.write_table(RESTAURANTS_FILE, RESTAURANT_COLUMNS, &rows)
            .await?;
        Ok(removed)
    }

    async fn clear_restaurants(&self) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        self.write_table::<RestaurantRecord>(RESTAURANTS_FILE, RESTAURANT_COLUMNS, &[])
            .await
    }

    async fn history(&self) -> AppResult<Vec<VisitRecord>> {
        self.read_history().await
    }

    async fn append_visit(&self, visit: VisitRecord) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut rows: Vec<HistoryRow> = self.read_table(HISTORY_FILE).await?;
        rows.push(HistoryRow::from(visit));
        self.write_table(HISTORY_FILE, HISTORY_COLUMNS, &rows).await
    }

    async fn export_recommendations(&self, ranked: &[RankedRecommendation]) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        let rows: Vec<RecommendationRow<'_>> = ranked.iter().map(RecommendationRow::from).collect();
        self.write_table(RECOMMENDATIONS_FILE, RECOMMENDATION_COLUMNS, &rows)
            .await
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
