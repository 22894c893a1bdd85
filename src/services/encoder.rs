use std::collections::BTreeSet;

use crate::{
    error::{AppError, AppResult},
    models::CanonicalCuisine,
};

/// One-hot encoder over the cuisines seen at fit time
///
/// Columns are the distinct fitted cuisines in lexicographic order. A cuisine that was not
/// seen during `fit` encodes to the all-zero vector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryEncoder {
    vocabulary: Option<Vec<CanonicalCuisine>>,
}

impl CategoryEncoder {
    /// Creates an unfitted encoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an encoder fitted on `cuisines`
    pub fn fitted<'a, I>(cuisines: I) -> Self
    where
        I: IntoIterator<Item = &'a CanonicalCuisine>,
    {
        let mut encoder = Self::new();
        encoder.fit(cuisines);
        encoder
    }

    /// Records the vocabulary, replacing any previous one
    pub fn fit<'a, I>(&mut self, cuisines: I)
    where
        I: IntoIterator<Item = &'a CanonicalCuisine>,
    {
        let distinct: BTreeSet<&CanonicalCuisine> = cuisines.into_iter().collect();
        self.vocabulary = Some(distinct.into_iter().cloned().collect());
    }

    pub fn is_fitted(&self) -> bool {
        self.vocabulary.is_some()
    }

    /// Fitted columns in order
    pub fn categories(&self) -> AppResult<&[CanonicalCuisine]> {
        self.vocabulary.as_deref().ok_or(AppError::NotFitted)
    }

    /// Number of one-hot columns
    pub fn width(&self) -> AppResult<usize> {
        self.categories().map(<[CanonicalCuisine]>::len)
    }

    pub fn transform(&self, cuisine: &CanonicalCuisine) -> AppResult<Vec<f64>> {
        let categories = self.categories()?;
        let mut encoded = vec![0.0; categories.len()];

        if let Ok(idx) = categories.binary_search(cuisine) {
            encoded[idx] = 1.0;
        }

        Ok(encoded)
    }

    /// Full model input for one row: `[one-hot cuisine] ++ [rating, price]`
    pub fn features(&self, cuisine: &CanonicalCuisine, rating: f64, price: u8) -> AppResult<Vec<f64>> {
        let mut features = self.transform(cuisine)?;
        features.push(rating);
        features.push(f64::from(price));
        Ok(features)
    }
}
