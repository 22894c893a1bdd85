use std::path::PathBuf;

use serde::Deserialize;

use crate::services::preference_model::FitOptions;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the restaurant and history tables
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Minimum number of rated visits before a recommendation is attempted
    #[serde(default = "default_min_history")]
    pub min_history: usize,

    /// Maximum number of dishes suggested for the top cuisine
    #[serde(default = "default_dish_limit")]
    pub dish_limit: usize,

    /// Lowest personal rating (1-10) that counts as a best-loved dish
    #[serde(default = "default_dish_min_rating")]
    pub dish_min_rating: u8,

    /// L2 penalty on the logistic parameters
    #[serde(default = "default_l2_penalty")]
    pub l2_penalty: f64,

    /// Newton iteration cap
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Convergence threshold on the largest parameter update
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_min_history() -> usize {
    3
}

fn default_dish_limit() -> usize {
    3
}

fn default_dish_min_rating() -> u8 {
    8
}

fn default_l2_penalty() -> f64 {
    FitOptions::default().l2_penalty
}

fn default_max_iterations() -> usize {
    FitOptions::default().max_iterations
}

fn default_tolerance() -> f64 {
    FitOptions::default().tolerance
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: default_data_dir(),
            min_history: default_min_history(),
            dish_limit: default_dish_limit(),
            dish_min_rating: default_dish_min_rating(),
            l2_penalty: default_l2_penalty(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects optimizer and dish settings the recommender cannot work with
    pub fn validate(&self) -> anyhow::Result<()> {
        // a zero penalty leaves the Hessian singular for short histories
        if !(self.l2_penalty.is_finite() && self.l2_penalty > 0.0) {
            anyhow::bail!("L2_PENALTY must be a positive number, got {}", self.l2_penalty);
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            anyhow::bail!("TOLERANCE must be a positive number, got {}", self.tolerance);
        }
        if self.max_iterations == 0 {
            anyhow::bail!("MAX_ITERATIONS must be at least 1");
        }
        if !(1..=10).contains(&self.dish_min_rating) {
            anyhow::bail!(
                "DISH_MIN_RATING must be between 1 and 10, got {}",
                self.dish_min_rating
            );
        }
        Ok(())
    }

    /// Optimizer settings for the preference model
    pub fn fit_options(&self) -> FitOptions {
        FitOptions {
            l2_penalty: self.l2_penalty,
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
        }
    }

    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
